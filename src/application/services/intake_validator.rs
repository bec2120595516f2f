use std::io;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::stream;
use uuid::Uuid;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::{StagedFile, StoragePath};

const SUPPORTED_EXTENSIONS: [&str; 8] = ["wav", "mp3", "mp4", "aac", "ogg", "webm", "flac", "m4a"];

/// Raw upload payload as received from the web layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub media_type: String,
    pub data: Bytes,
}

/// Size bounds for accepted uploads. Passed in at construction rather than
/// read from ambient state.
#[derive(Debug, Clone, Copy)]
pub struct IntakeLimits {
    pub min_bytes: u64,
    pub max_bytes: u64,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            min_bytes: 1000,
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Accepts a raw upload, enforces presence/type/size constraints, and writes
/// the payload to staging under a collision-resistant name.
pub struct IntakeValidator {
    staging: Arc<dyn StagingStore>,
    limits: IntakeLimits,
}

impl IntakeValidator {
    pub fn new(staging: Arc<dyn StagingStore>, limits: IntakeLimits) -> Self {
        Self { staging, limits }
    }

    pub async fn stage(&self, upload: Option<Upload>) -> Result<StagedFile, IntakeError> {
        let upload = upload.ok_or(ValidationError::MissingFile)?;

        let extension = matched_extension(&upload.filename)
            .ok_or_else(|| ValidationError::UnsupportedType(upload.filename.clone()))?;

        let size = upload.data.len() as u64;
        if size < self.limits.min_bytes {
            return Err(ValidationError::TooSmall(size).into());
        }
        if size > self.limits.max_bytes {
            return Err(ValidationError::TooLarge(size).into());
        }

        let path = StoragePath::from_raw(format!(
            "audio-{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension,
        ));

        let byte_stream = Box::pin(stream::iter([Ok::<_, io::Error>(upload.data.clone())]));
        let written = self.staging.store(&path, byte_stream).await?;

        tracing::debug!(
            path = %path,
            filename = %upload.filename,
            bytes = written,
            "Upload staged"
        );

        Ok(StagedFile::new(
            path,
            upload.filename,
            size,
            upload.media_type,
        ))
    }
}

fn matched_extension(filename: &str) -> Option<&'static str> {
    let lowered = filename.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|ext| lowered.ends_with(&format!(".{}", ext)))
        .copied()
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no audio file uploaded")]
    MissingFile,
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file too small: {0} bytes")]
    TooSmall(u64),
    #[error("file too large: {0} bytes")]
    TooLarge(u64),
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("staging write failed: {0}")]
    Staging(#[from] StagingStoreError),
}
