use async_trait::async_trait;

use crate::domain::{JobId, JobStatus, UploadHandle};

/// Fixed option set sent with every job request: punctuation, text
/// formatting, and language auto-detection all on.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptionOptions {
    pub punctuate: bool,
    pub format_text: bool,
    pub language_detection: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            punctuate: true,
            format_text: true,
            language_detection: true,
        }
    }
}

/// One observation of a provider-side job.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub text: Option<String>,
    pub error: Option<String>,
}

/// The external speech-to-text provider. Owns all knowledge of the wire
/// shapes; callers only see handles, job ids, and snapshots.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn submit_audio(&self, audio: &[u8]) -> Result<UploadHandle, ProviderError>;

    async fn start_job(
        &self,
        handle: &UploadHandle,
        options: &TranscriptionOptions,
    ) -> Result<JobId, ProviderError>;

    async fn poll_job(&self, job: &JobId) -> Result<JobSnapshot, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    Configuration(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected request: {0}")]
    Rejected(String),
}
