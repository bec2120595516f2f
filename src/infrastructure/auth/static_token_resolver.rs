use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::{CallerIdentity, IdentityError, IdentityResolver};
use crate::domain::OwnerId;

/// Identity resolver over a fixed token-to-account map, loaded from
/// configuration. Token issuance lives outside this service; unknown
/// credentials simply resolve to nothing.
pub struct StaticTokenResolver {
    tokens: HashMap<String, OwnerId>,
}

impl StaticTokenResolver {
    pub fn new(tokens: HashMap<String, Uuid>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|(token, owner)| (token, OwnerId::from_uuid(owner)))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenResolver {
    async fn resolve(&self, credential: &str) -> Result<Option<CallerIdentity>, IdentityError> {
        Ok(self
            .tokens
            .get(credential)
            .map(|owner_id| CallerIdentity {
                owner_id: *owner_id,
            }))
    }
}
