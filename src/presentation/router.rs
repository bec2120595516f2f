use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::SpeechProvider;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    ErrorBody, delete_transcript_handler, health_handler, history_handler, upload_handler,
};
use crate::presentation::middleware::auth_middleware;
use crate::presentation::state::AppState;

// multipart framing overhead on top of the 50 MiB upload ceiling
const MAX_REQUEST_BYTES: usize = 51 * 1024 * 1024;

pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: SpeechProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let protected = Router::new()
        .route("/upload", post(upload_handler::<P>))
        .route("/history", get(history_handler::<P>))
        .route("/history/{id}", delete(delete_transcript_handler::<P>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.identity_resolver),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}
