use axum::Json;
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{CallerIdentity, SpeechProvider};
use crate::application::services::Upload;
use crate::presentation::handlers::{ErrorBody, TranscriptDto, pipeline_error_response};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file: TranscriptDto,
}

/// `POST /upload`: runs the full transcription pipeline for the multipart
/// `audio` field and returns the persisted record. Terminal job failures
/// come back as a persisted `failed` record, not as a transport error.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<P>(
    State(state): State<AppState<P>>,
    Extension(caller): Extension<CallerIdentity>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    P: SpeechProvider + 'static,
{
    let mut upload: Option<Upload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new(format!("Failed to read multipart: {}", e))),
                )
                    .into_response();
            }
        };

        if field.name() != Some("audio") {
            continue;
        }

        let filename = field.file_name().unwrap_or("audio").to_string();
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, filename = %filename, "Failed to read upload bytes");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new(format!("Failed to read file: {}", e))),
                )
                    .into_response();
            }
        };

        tracing::debug!(filename = %filename, bytes = data.len(), "Upload received");

        upload = Some(Upload {
            filename,
            media_type,
            data,
        });
        break;
    }

    match state
        .transcription_service
        .process(upload, caller.owner_id)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                file: TranscriptDto::from(&record),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
