/// Single-object decoding for the `inspect` command
use crate::error::{IndexerError, Result};
use soul_flac_meta::{read_track, Track};
use soul_remote::{HttpRangeReader, LocalStore, Locator, ObjectReader};
use std::path::Path;
use std::sync::Arc;

/// Decode one object given as an `http(s)://` URL or a local file path.
pub async fn inspect(target: &str, min_chunk_size: usize) -> Result<Track> {
    if target.starts_with("http://") || target.starts_with("https://") {
        let reader = HttpRangeReader::new(target)?;
        let locator = url_locator(target);
        return Ok(read_track(locator, reader, min_chunk_size).await?);
    }

    let (store, locator) = local_object(Path::new(target)).await?;
    let reader = ObjectReader::new(Arc::new(store), locator.clone());
    Ok(read_track(locator, reader, min_chunk_size).await?)
}

/// Host as bucket, path as key.
fn url_locator(url: &str) -> Locator {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    match rest.split_once('/') {
        Some((host, path)) => Locator::new(host, path),
        None => Locator::new(rest, ""),
    }
}

/// A local file as an object: its directory is the bucket, its parent the
/// store root.
async fn local_object(path: &Path) -> Result<(LocalStore, Locator)> {
    let path = tokio::fs::canonicalize(path).await?;

    let key = path.file_name().and_then(|n| n.to_str());
    let bucket_dir = path.parent();
    let bucket = bucket_dir.and_then(|d| d.file_name()).and_then(|n| n.to_str());
    let root = bucket_dir.and_then(|d| d.parent());

    match (root, bucket, key) {
        (Some(root), Some(bucket), Some(key)) => {
            Ok((LocalStore::new(root), Locator::new(bucket, key)))
        }
        _ => Err(IndexerError::InvalidTarget(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_locators() {
        assert_eq!(
            url_locator("https://cdn.example.com/music/a.flac?X-Amz-Expires=60"),
            Locator::new("cdn.example.com", "music/a.flac")
        );
        assert_eq!(
            url_locator("http://localhost:9000"),
            Locator::new("localhost:9000", "")
        );
    }

    #[tokio::test]
    async fn local_file_maps_to_bucket_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = dir.path().join("music");
        std::fs::create_dir(&bucket).unwrap();
        std::fs::write(bucket.join("a.flac"), b"fLaC").unwrap();

        let (store, locator) = local_object(&bucket.join("a.flac")).await.unwrap();

        assert_eq!(locator, Locator::new("music", "a.flac"));
        assert_eq!(
            store.root(),
            std::fs::canonicalize(dir.path()).unwrap().as_path()
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        assert!(matches!(
            inspect("/nonexistent/dir/a.flac", 1).await,
            Err(IndexerError::Io(_))
        ));
    }
}
