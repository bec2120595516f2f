use async_trait::async_trait;

use crate::domain::OwnerId;

/// Authenticated caller attached to a request after credential resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub owner_id: OwnerId,
}

/// Capability consumed from the (external) auth system: map a presented
/// credential to an account, or to nothing if the credential is unknown.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<Option<CallerIdentity>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity resolution failed: {0}")]
    ResolutionFailed(String),
}
