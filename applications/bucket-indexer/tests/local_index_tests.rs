//! Indexing fixtures written to a local directory bucket.

use soul_bucket_indexer::{inspect, render_table, rows_with_urls, Fixture};
use soul_bucket_scan::{BucketIndexer, ScanConfig};
use soul_flac_meta::Picture;
use soul_remote::LocalStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn fixture(tags: &[&str]) -> Fixture {
    Fixture {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Fixture::default()
    }
}

async fn write_album(bucket: &Path) {
    fixture(&["TITLE=Second", "ARTIST=Band", "ALBUM=Debut", "TRACKNUMBER=2"])
        .write(&bucket.join("debut/02.flac"))
        .await
        .unwrap();

    let mut first = fixture(&["TITLE=First", "ARTIST=Band", "ALBUM=Debut", "TRACKNUMBER=1"]);
    first.cover = Some(Picture::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]));
    first.write(&bucket.join("debut/01.flac")).await.unwrap();

    tokio::fs::write(bucket.join("debut/cover.jpg"), [0xFF, 0xD8])
        .await
        .unwrap();
}

#[tokio::test]
async fn indexes_local_bucket_in_listing_order() {
    let dir = tempfile::tempdir().unwrap();
    write_album(&dir.path().join("music")).await;

    let store = Arc::new(LocalStore::new(dir.path()));
    let indexer = BucketIndexer::new(store.clone(), ScanConfig::default());
    let (tracks, stats) = indexer.collect("music").await.unwrap();

    assert_eq!(stats.discovered, 2);
    assert_eq!(stats.failed(), 0);

    let titles: Vec<_> = tracks.iter().filter_map(|t| t.title()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert!(tracks[0].has_cover());
    assert!(!tracks[1].has_cover());

    let rows = rows_with_urls(store.as_ref(), &tracks, Duration::from_secs(60)).await;
    let url = rows[0].url.as_deref().unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.ends_with("/music/debut/01.flac"));

    let table = render_table(&rows);
    assert!(table.starts_with(" 1  Band / Debut / First  [cover]\n"));
}

#[tokio::test]
async fn inspect_reads_a_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("music/single.flac");
    fixture(&["TITLE=Alone", "Comment=a=b"])
        .write(&path)
        .await
        .unwrap();

    let track = inspect(path.to_str().unwrap(), soul_remote::DEFAULT_MIN_CHUNK_SIZE)
        .await
        .unwrap();

    assert_eq!(track.locator.bucket, "music");
    assert_eq!(track.locator.key, "single.flac");
    assert_eq!(track.title(), Some("Alone"));
    assert_eq!(track.tag("comment"), Some("a=b"));
}

#[tokio::test]
async fn unpadded_fixture_needs_a_smaller_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("music/tiny.flac");
    Fixture {
        audio_bytes: 0,
        ..fixture(&["TITLE=Tiny"])
    }
    .write(&path)
    .await
    .unwrap();

    let target = path.to_str().unwrap();
    assert!(inspect(target, soul_remote::DEFAULT_MIN_CHUNK_SIZE).await.is_err());
    assert_eq!(inspect(target, 1).await.unwrap().title(), Some("Tiny"));
}
