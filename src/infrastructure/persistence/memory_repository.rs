use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{RepositoryError, TranscriptRepository};
use crate::domain::{OwnerId, TranscriptId, TranscriptRecord};

/// Process-local repository used when no database is configured, and by
/// tests. Per-record operations are atomic under the lock.
#[derive(Default)]
pub struct InMemoryTranscriptRepository {
    records: RwLock<Vec<TranscriptRecord>>,
}

impl InMemoryTranscriptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptRepository for InMemoryTranscriptRepository {
    async fn create(&self, record: &TranscriptRecord) -> Result<(), RepositoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate record id: {}",
                record.id.as_uuid()
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<TranscriptRecord>, RepositoryError> {
        let records = self
            .records
            .read()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let mut owned: Vec<TranscriptRecord> = records
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect();
        // insertion order already breaks created_at ties newest-first
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<Option<TranscriptRecord>, RepositoryError> {
        let records = self
            .records
            .read()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(records
            .iter()
            .find(|r| r.id == id && r.owner_id == owner)
            .cloned())
    }

    async fn delete_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<bool, RepositoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let before = records.len();
        records.retain(|r| !(r.id == id && r.owner_id == owner));
        Ok(records.len() < before)
    }
}
