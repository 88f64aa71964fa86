//! Tests for the directory-backed object store.

use soul_remote::{ByteCursor, LocalStore, Locator, ObjectReader, ObjectStore, RemoteError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn fixture() -> (TempDir, LocalStore) {
    let dir = TempDir::new().unwrap();
    let bucket = dir.path().join("music");
    std::fs::create_dir_all(bucket.join("album/disc 1")).unwrap();
    std::fs::write(bucket.join("album/disc 1/01.flac"), b"fLaC-one").unwrap();
    std::fs::write(bucket.join("album/cover.jpg"), b"jpeg").unwrap();
    std::fs::write(bucket.join("b.flac"), (0u8..=255).collect::<Vec<_>>()).unwrap();

    let store = LocalStore::new(dir.path());
    (dir, store)
}

#[tokio::test]
async fn list_returns_relative_keys() {
    let (_dir, store) = fixture();

    let keys = store.list("music").await.unwrap();

    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"album/disc 1/01.flac".to_string()));
    assert!(keys.contains(&"album/cover.jpg".to_string()));
    assert!(keys.contains(&"b.flac".to_string()));
}

#[tokio::test]
async fn missing_bucket_is_an_error() {
    let (_dir, store) = fixture();

    assert!(matches!(
        store.list("podcasts").await,
        Err(RemoteError::BucketNotFound(_))
    ));
}

#[tokio::test]
async fn file_in_place_of_bucket_is_not_a_bucket() {
    let (dir, store) = fixture();
    std::fs::write(dir.path().join("notes"), b"plain file").unwrap();

    match store.list("notes").await {
        Err(RemoteError::BucketNotFound(bucket)) => assert_eq!(bucket, "notes"),
        other => panic!("Expected BucketNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn range_read_is_exact() {
    let (_dir, store) = fixture();
    let locator = Locator::new("music", "b.flac");

    let bytes = store.read_range(&locator, 4, 10).await.unwrap();
    assert_eq!(bytes, vec![10, 11, 12, 13]);

    let tail = store.read_range(&locator, 6, 250).await.unwrap();
    assert_eq!(tail, vec![250, 251, 252, 253, 254, 255]);
}

#[tokio::test]
async fn range_past_end_is_short_read() {
    let (_dir, store) = fixture();
    let locator = Locator::new("music", "b.flac");

    match store.read_range(&locator, 10, 250).await {
        Err(RemoteError::ShortRead {
            requested,
            received,
            ..
        }) => {
            assert_eq!(requested, 10);
            assert_eq!(received, 6);
        }
        other => panic!("Expected ShortRead, got {:?}", other.map(|b| b.len())),
    }
}

#[tokio::test]
async fn missing_object_is_not_found() {
    let (_dir, store) = fixture();
    let locator = Locator::new("music", "nope.flac");

    assert!(matches!(
        store.read_range(&locator, 1, 0).await,
        Err(RemoteError::ObjectNotFound(_))
    ));
}

#[tokio::test]
async fn signed_url_is_file_url() {
    let (_dir, store) = fixture();
    let locator = Locator::new("music", "album/disc 1/01.flac");

    let url = store
        .signed_url(&locator, Duration::from_secs(60))
        .await
        .unwrap();

    assert!(url.starts_with("file://"));
    assert!(url.ends_with("/album/disc%201/01.flac"));
}

#[tokio::test]
async fn cursor_over_local_object() {
    let (_dir, store) = fixture();
    let store: Arc<dyn ObjectStore> = Arc::new(store);
    let reader = ObjectReader::new(store, Locator::new("music", "album/disc 1/01.flac"));
    let mut cursor = ByteCursor::with_chunk_size(reader, 4);

    assert_eq!(cursor.text(4).await.unwrap(), "fLaC");
    assert_eq!(cursor.u8().await.unwrap(), b'-');
    assert_eq!(cursor.position(), 5);
    assert_eq!(cursor.fetch_count(), 2);
}
