use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::ports::IdentityResolver;
use crate::presentation::handlers::ErrorBody;

/// Resolves the bearer credential on protected routes and attaches the
/// resulting `CallerIdentity` as a request extension. Requests without a
/// resolvable identity never reach a handler.
pub async fn auth_middleware(
    State(resolver): State<Arc<dyn IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(credential) = credential else {
        return unauthorized("Access token required");
    };

    match resolver.resolve(&credential).await {
        Ok(Some(caller)) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Request with unknown access token");
            unauthorized("Invalid token")
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Token verification failed")),
            )
                .into_response()
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(message))).into_response()
}
