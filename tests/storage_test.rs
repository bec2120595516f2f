use std::io;

use bytes::Bytes;
use futures::stream;

use parlance::application::ports::{StagingStore, StagingStoreError};
use parlance::domain::StoragePath;
use parlance::infrastructure::storage::LocalStagingStore;

fn create_test_store() -> (tempfile::TempDir, LocalStagingStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalStagingStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_valid_stream_when_storing_then_bytes_counted_and_fetchable() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::from_raw("audio-1-test.wav");

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let byte_stream = Box::pin(stream::iter(chunks));

    let size = store.store(&path, byte_stream).await.unwrap();
    assert_eq!(size, 11);

    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(fetched, b"hello world");
}

#[tokio::test]
async fn given_stored_file_when_deleting_then_fetch_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::from_raw("audio-2-test.wav");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.store(&path, byte_stream).await.unwrap();

    store.delete(&path).await.unwrap();

    let result = store.fetch(&path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn given_missing_object_when_deleting_then_not_found_error_kind() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::from_raw("audio-3-missing.wav");

    let result = store.delete(&path).await;

    assert!(matches!(result, Err(StagingStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_stream_error_when_storing_then_returns_error() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::from_raw("audio-4-test.wav");

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "network drop",
        )),
    ];
    let byte_stream = Box::pin(stream::iter(chunks));

    let result = store.store(&path, byte_stream).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn given_stored_and_missing_paths_when_checking_existence_then_reported_correctly() {
    let (_dir, store) = create_test_store();
    let present = StoragePath::from_raw("audio-5-test.wav");
    let absent = StoragePath::from_raw("audio-6-missing.wav");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.store(&present, byte_stream).await.unwrap();

    assert!(store.exists(&present).await.unwrap());
    assert!(!store.exists(&absent).await.unwrap());
}
