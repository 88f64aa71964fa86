//! Directory-backed object store.
//!
//! Each sub-directory of the root is a bucket; keys are the `/`-separated
//! paths of the files below it.

use crate::error::{RemoteError, Result};
use crate::locator::Locator;
use crate::store::ObjectStore;
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;
use url::Url;
use walkdir::WalkDir;

/// Object store over a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.is_empty() || !is_plain_relative(Path::new(bucket)) || bucket.contains('/') {
            return Err(RemoteError::BucketNotFound(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, locator: &Locator) -> Result<PathBuf> {
        let bucket = self.bucket_path(&locator.bucket)?;
        let key = Path::new(&locator.key);
        if locator.key.is_empty() || !is_plain_relative(key) {
            return Err(RemoteError::ObjectNotFound(locator.to_string()));
        }
        Ok(bucket.join(key))
    }
}

/// Only normal components: no root, no `..`, no drive prefix.
fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

fn key_for(bucket_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn list(&self, bucket: &str) -> Result<Vec<String>> {
        let bucket_root = self.bucket_path(bucket)?;
        let name = bucket.to_string();

        // Directory check and walk both touch the filesystem synchronously
        let keys = tokio::task::spawn_blocking(move || {
            if !bucket_root.is_dir() {
                return Err(RemoteError::BucketNotFound(name));
            }
            Ok(WalkDir::new(&bucket_root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| key_for(&bucket_root, entry.path()))
                .collect::<Vec<_>>())
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!(bucket, count = keys.len(), "Listed local bucket");
        Ok(keys)
    }

    async fn read_range(
        &self,
        locator: &Locator,
        length: usize,
        position: u64,
    ) -> Result<Vec<u8>> {
        let path = self.object_path(locator)?;
        let mut file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RemoteError::ObjectNotFound(locator.to_string())
            } else {
                RemoteError::Io(e)
            }
        })?;

        file.seek(SeekFrom::Start(position)).await?;

        // Header-derived lengths are untrusted, cap the up-front reservation
        let mut data = Vec::with_capacity(length.min(1 << 20));
        file.take(length as u64).read_to_end(&mut data).await?;

        if data.len() < length {
            return Err(RemoteError::ShortRead {
                position,
                requested: length,
                received: data.len(),
            });
        }

        Ok(data)
    }

    async fn signed_url(&self, locator: &Locator, _expires_in: Duration) -> Result<String> {
        let path = self.object_path(locator)?;
        let path = tokio::fs::canonicalize(&path)
            .await
            .map_err(|_| RemoteError::ObjectNotFound(locator.to_string()))?;

        Url::from_file_path(&path)
            .map(String::from)
            .map_err(|()| RemoteError::InvalidUrl(path.display().to_string()))
    }
}
