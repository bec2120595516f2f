use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use parlance::application::ports::{
    JobSnapshot, ProviderError, SpeechProvider, StagingStore, TranscriptionOptions,
};
use parlance::application::services::{
    IntakeLimits, IntakeValidator, JobPoller, TranscriptionService,
};
use parlance::domain::{JobId, JobStatus, UploadHandle};
use parlance::infrastructure::auth::StaticTokenResolver;
use parlance::infrastructure::persistence::InMemoryTranscriptRepository;
use parlance::infrastructure::storage::LocalStagingStore;
use parlance::presentation::{AppState, create_router};

const BOUNDARY: &str = "parlance-test-boundary";
const TOKEN_A: &str = "token-owner-a";
const TOKEN_B: &str = "token-owner-b";

/// Provider double that completes every job on the first poll.
struct ImmediateProvider {
    transcript: &'static str,
}

#[async_trait::async_trait]
impl SpeechProvider for ImmediateProvider {
    async fn submit_audio(&self, _audio: &[u8]) -> Result<UploadHandle, ProviderError> {
        Ok(UploadHandle::new("https://example.test/upload/1"))
    }

    async fn start_job(
        &self,
        _handle: &UploadHandle,
        _options: &TranscriptionOptions,
    ) -> Result<JobId, ProviderError> {
        Ok(JobId::new("job-1"))
    }

    async fn poll_job(&self, _job: &JobId) -> Result<JobSnapshot, ProviderError> {
        Ok(JobSnapshot {
            status: JobStatus::Completed,
            text: Some(self.transcript.to_string()),
            error: None,
        })
    }
}

fn create_test_app() -> (axum::Router, tempfile::TempDir) {
    let staging_dir = tempfile::TempDir::new().unwrap();
    let staging: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(staging_dir.path().to_path_buf()).unwrap());
    let repository = Arc::new(InMemoryTranscriptRepository::new());
    let provider = Arc::new(ImmediateProvider {
        transcript: "hello world",
    });

    let transcription_service = Arc::new(TranscriptionService::new(
        IntakeValidator::new(Arc::clone(&staging), IntakeLimits::default()),
        provider,
        JobPoller::new(Duration::from_secs(3), 60),
        staging,
        repository,
    ));

    let tokens: HashMap<String, Uuid> = HashMap::from([
        (TOKEN_A.to_string(), Uuid::new_v4()),
        (TOKEN_B.to_string(), Uuid::new_v4()),
    ]);

    let state = AppState {
        transcription_service,
        identity_resolver: Arc::new(StaticTokenResolver::new(tokens)),
    };

    (create_router(state), staging_dir)
}

fn multipart_body(field: &str, filename: &str, bytes: usize) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: audio/wav\r\n\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(&vec![b'a'; bytes]);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok_without_auth() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn given_no_token_when_uploading_then_unauthorized() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("audio", "recording.wav", 2000);
    let response = app.oneshot(upload_request(None, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn given_unknown_token_when_uploading_then_unauthorized() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("audio", "recording.wav", 2000);
    let response = app
        .oneshot(upload_request(Some("not-a-token"), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_valid_upload_when_job_completes_then_record_returned_without_file_path() {
    let (app, staging_dir) = create_test_app();

    let body = multipart_body("audio", "recording.wav", 2000);
    let response = app
        .oneshot(upload_request(Some(TOKEN_A), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["file"]["status"], "completed");
    assert_eq!(json["file"]["transcription"], "hello world");
    assert_eq!(json["file"]["filename"], "recording.wav");
    assert!(json["file"].get("file_path").is_none());
    assert!(json["file"].get("filepath").is_none());

    assert_eq!(std::fs::read_dir(staging_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_multipart_without_audio_field_when_uploading_then_bad_request() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("document", "recording.wav", 2000);
    let response = app
        .oneshot(upload_request(Some(TOKEN_A), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn given_too_small_file_when_uploading_then_bad_request() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("audio", "recording.wav", 500);
    let response = app
        .oneshot(upload_request(Some(TOKEN_A), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unsupported_extension_when_uploading_then_unsupported_media_type() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("audio", "notes.txt", 2000);
    let response = app
        .oneshot(upload_request(Some(TOKEN_A), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn given_uploads_by_one_owner_when_listing_history_then_scoped_to_caller() {
    let (app, _dir) = create_test_app();

    let body = multipart_body("audio", "recording.wav", 2000);
    let response = app
        .clone()
        .oneshot(upload_request(Some(TOKEN_A), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let history_a = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/history")
                .header("authorization", format!("Bearer {}", TOKEN_A))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(history_a.status(), StatusCode::OK);
    let json_a = response_json(history_a).await;
    assert_eq!(json_a["data"].as_array().unwrap().len(), 1);
    assert_eq!(json_a["data"][0]["transcription"], "hello world");

    let history_b = app
        .oneshot(
            Request::builder()
                .uri("/history")
                .header("authorization", format!("Bearer {}", TOKEN_B))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(history_b.status(), StatusCode::OK);
    let json_b = response_json(history_b).await;
    assert!(json_b["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn given_unknown_record_id_when_deleting_then_not_found() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/history/{}", Uuid::new_v4()))
                .header("authorization", format!("Bearer {}", TOKEN_A))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_malformed_record_id_when_deleting_then_bad_request() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/history/not-a-uuid")
                .header("authorization", format!("Bearer {}", TOKEN_A))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_route_when_requested_then_structured_not_found() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn given_request_with_id_when_any_endpoint_then_response_echoes_request_id() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-request-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}
