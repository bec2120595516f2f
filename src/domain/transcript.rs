use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{OwnerId, StagedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranscriptId(Uuid);

impl TranscriptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TranscriptId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Processing,
    Completed,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Processing => "processing",
            RecordStatus::Completed => "completed",
            RecordStatus::Failed => "failed",
        }
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(RecordStatus::Processing),
            "completed" => Ok(RecordStatus::Completed),
            "failed" => Ok(RecordStatus::Failed),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted outcome of one transcription job, owned by a single account.
///
/// `file_path` points at staging and is internal only; presentation must
/// never serialize it.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub id: TranscriptId,
    pub owner_id: OwnerId,
    pub filename: String,
    pub file_path: Option<String>,
    pub transcription: String,
    pub file_size: u64,
    pub media_type: String,
    pub status: RecordStatus,
    pub error_message: Option<String>,
    pub processing_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranscriptRecord {
    pub fn completed(
        owner_id: OwnerId,
        staged: &StagedFile,
        transcription: String,
        processing_ms: u64,
    ) -> Self {
        Self::build(
            owner_id,
            staged,
            RecordStatus::Completed,
            transcription,
            None,
            processing_ms,
        )
    }

    /// A failed record always carries a non-empty error message.
    pub fn failed(
        owner_id: OwnerId,
        staged: &StagedFile,
        error_message: String,
        processing_ms: u64,
    ) -> Self {
        let message = if error_message.trim().is_empty() {
            "Transcription failed".to_string()
        } else {
            error_message
        };
        Self::build(
            owner_id,
            staged,
            RecordStatus::Failed,
            String::new(),
            Some(message),
            processing_ms,
        )
    }

    fn build(
        owner_id: OwnerId,
        staged: &StagedFile,
        status: RecordStatus,
        transcription: String,
        error_message: Option<String>,
        processing_ms: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TranscriptId::new(),
            owner_id,
            filename: staged.original_name.clone(),
            file_path: Some(staged.path.as_str().to_string()),
            transcription,
            file_size: staged.size_bytes,
            media_type: staged.media_type.clone(),
            status,
            error_message,
            processing_ms: Some(processing_ms),
            created_at: now,
            updated_at: now,
        }
    }
}
