mod health;
mod history;
mod upload;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{IntakeError, PipelineError, ValidationError};
use crate::application::ports::ProviderError;
use crate::domain::TranscriptRecord;

pub use health::health_handler;
pub use history::{delete_transcript_handler, history_handler};
pub use upload::upload_handler;

/// Structured failure body: `{"success": false, "error": …}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// External view of a transcript record. The staged file path is internal
/// and deliberately has no field here.
#[derive(Serialize)]
pub struct TranscriptDto {
    pub id: String,
    pub filename: String,
    pub transcription: String,
    pub file_size: u64,
    pub mime_type: String,
    pub status: String,
    pub error_message: Option<String>,
    pub processing_ms: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&TranscriptRecord> for TranscriptDto {
    fn from(record: &TranscriptRecord) -> Self {
        Self {
            id: record.id.as_uuid().to_string(),
            filename: record.filename.clone(),
            transcription: record.transcription.clone(),
            file_size: record.file_size,
            mime_type: record.media_type.clone(),
            status: record.status.as_str().to_string(),
            error_message: record.error_message.clone(),
            processing_ms: record.processing_ms,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Maps submission-time pipeline failures to responses. Caller mistakes
/// surface verbatim; infrastructure detail stays in the logs.
pub(crate) fn pipeline_error_response(error: PipelineError) -> Response {
    let (status, message) = match &error {
        PipelineError::Intake(IntakeError::Rejected(validation)) => {
            let status = match validation {
                ValidationError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, validation.to_string())
        }
        PipelineError::Intake(IntakeError::Staging(e)) => {
            tracing::error!(error = %e, "Failed to stage upload");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store upload".to_string(),
            )
        }
        PipelineError::Provider(ProviderError::Configuration(e)) => {
            tracing::error!(error = %e, "Speech provider is misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Transcription service is not configured".to_string(),
            )
        }
        PipelineError::Provider(e) => {
            tracing::warn!(error = %e, "Speech provider call failed");
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
        PipelineError::Staging(e) => {
            tracing::error!(error = %e, "Staging store failure during pipeline");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read staged upload".to_string(),
            )
        }
        PipelineError::Store(e) => {
            tracing::error!(error = %e, "Record store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist transcription".to_string(),
            )
        }
    };

    (status, Json(ErrorBody::new(message))).into_response()
}
