use async_trait::async_trait;

use crate::domain::{OwnerId, TranscriptId, TranscriptRecord};

/// Owner-scoped transcript persistence. Every query carries the owner so a
/// record belonging to a different account behaves exactly like a missing
/// one.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    async fn create(&self, record: &TranscriptRecord) -> Result<(), RepositoryError>;

    /// Records owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: OwnerId) -> Result<Vec<TranscriptRecord>, RepositoryError>;

    async fn find_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<Option<TranscriptRecord>, RepositoryError>;

    /// Returns whether a record was found and deleted.
    async fn delete_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}
