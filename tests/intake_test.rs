use std::sync::Arc;

use bytes::Bytes;

use parlance::application::ports::StagingStore;
use parlance::application::services::{
    IntakeError, IntakeLimits, IntakeValidator, Upload, ValidationError,
};
use parlance::infrastructure::storage::LocalStagingStore;

fn create_validator(limits: IntakeLimits) -> (tempfile::TempDir, IntakeValidator, Arc<dyn StagingStore>) {
    let dir = tempfile::TempDir::new().unwrap();
    let staging: Arc<dyn StagingStore> =
        Arc::new(LocalStagingStore::new(dir.path().to_path_buf()).unwrap());
    let validator = IntakeValidator::new(Arc::clone(&staging), limits);
    (dir, validator, staging)
}

fn upload(filename: &str, bytes: usize) -> Option<Upload> {
    Some(Upload {
        filename: filename.to_string(),
        media_type: "audio/wav".to_string(),
        data: Bytes::from(vec![0u8; bytes]),
    })
}

#[tokio::test]
async fn given_valid_wav_when_staging_then_file_written_under_generated_name() {
    let (dir, validator, staging) = create_validator(IntakeLimits::default());

    let staged = validator.stage(upload("recording.wav", 2000)).await.unwrap();

    assert_eq!(staged.original_name, "recording.wav");
    assert_eq!(staged.size_bytes, 2000);
    assert!(staged.path.as_str().starts_with("audio-"));
    assert!(staged.path.as_str().ends_with(".wav"));
    assert!(staging.exists(&staged.path).await.unwrap());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn given_uppercase_extension_when_staging_then_accepted() {
    let (_dir, validator, _staging) = create_validator(IntakeLimits::default());

    let staged = validator.stage(upload("RECORDING.WAV", 2000)).await.unwrap();

    assert!(staged.path.as_str().ends_with(".wav"));
}

#[tokio::test]
async fn given_m4a_extension_when_staging_then_accepted() {
    let (_dir, validator, _staging) = create_validator(IntakeLimits::default());

    let staged = validator.stage(upload("memo.m4a", 2000)).await.unwrap();

    assert!(staged.path.as_str().ends_with(".m4a"));
}

#[tokio::test]
async fn given_unsupported_extension_when_staging_then_rejected_and_nothing_written() {
    let (dir, validator, _staging) = create_validator(IntakeLimits::default());

    let result = validator.stage(upload("notes.txt", 2000)).await;

    assert!(matches!(
        result,
        Err(IntakeError::Rejected(ValidationError::UnsupportedType(_)))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_no_payload_when_staging_then_missing_file() {
    let (_dir, validator, _staging) = create_validator(IntakeLimits::default());

    let result = validator.stage(None).await;

    assert!(matches!(
        result,
        Err(IntakeError::Rejected(ValidationError::MissingFile))
    ));
}

#[tokio::test]
async fn given_undersized_payload_when_staging_then_too_small() {
    let (dir, validator, _staging) = create_validator(IntakeLimits::default());

    let result = validator.stage(upload("recording.wav", 999)).await;

    assert!(matches!(
        result,
        Err(IntakeError::Rejected(ValidationError::TooSmall(999)))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_oversized_payload_when_staging_then_too_large() {
    let limits = IntakeLimits {
        min_bytes: 1000,
        max_bytes: 2048,
    };
    let (dir, validator, _staging) = create_validator(limits);

    let result = validator.stage(upload("recording.wav", 4096)).await;

    assert!(matches!(
        result,
        Err(IntakeError::Rejected(ValidationError::TooLarge(4096)))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_two_uploads_with_same_name_when_staging_then_paths_do_not_collide() {
    let (_dir, validator, _staging) = create_validator(IntakeLimits::default());

    let first = validator.stage(upload("recording.wav", 2000)).await.unwrap();
    let second = validator.stage(upload("recording.wav", 2000)).await.unwrap();

    assert_ne!(first.path, second.path);
}
