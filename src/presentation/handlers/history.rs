use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{CallerIdentity, SpeechProvider};
use crate::domain::TranscriptId;
use crate::presentation::handlers::{ErrorBody, TranscriptDto, pipeline_error_response};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<TranscriptDto>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /history`: the caller's transcript records, newest first.
#[tracing::instrument(skip(state))]
pub async fn history_handler<P>(
    State(state): State<AppState<P>>,
    Extension(caller): Extension<CallerIdentity>,
) -> impl IntoResponse
where
    P: SpeechProvider + 'static,
{
    match state.transcription_service.history(caller.owner_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(HistoryResponse {
                success: true,
                data: records.iter().map(TranscriptDto::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}

/// `DELETE /history/{id}`: owner-scoped delete. A record owned by someone
/// else reports not-found, exactly like a missing one.
#[tracing::instrument(skip(state))]
pub async fn delete_transcript_handler<P>(
    State(state): State<AppState<P>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> impl IntoResponse
where
    P: SpeechProvider + 'static,
{
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(format!("Invalid record ID: {}", id))),
            )
                .into_response();
        }
    };

    match state
        .transcription_service
        .delete_for_owner(TranscriptId::from_uuid(uuid), caller.owner_id)
        .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                message: "Deleted".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found"))).into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
