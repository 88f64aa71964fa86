//! In-memory object store.

use crate::error::{RemoteError, Result};
use crate::locator::Locator;
use crate::range::slice_range;
use crate::store::ObjectStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

type Bucket = BTreeMap<String, Vec<u8>>;

/// Object store kept entirely in memory.
///
/// Keys list in lexical order. Every range read is counted so callers can
/// check how many round trips a consumer needed.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, Bucket>>,
    range_reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket (no-op if it exists).
    pub fn create_bucket(&self, bucket: impl Into<String>) {
        self.buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(bucket.into())
            .or_default();
    }

    /// Store an object, creating its bucket when needed.
    pub fn insert(&self, bucket: impl Into<String>, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(bucket.into())
            .or_default()
            .insert(key.into(), data.into());
    }

    /// Total range reads served.
    pub fn range_reads(&self) -> usize {
        self.range_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, bucket: &str) -> Result<Vec<String>> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .ok_or_else(|| RemoteError::BucketNotFound(bucket.to_string()))
    }

    async fn read_range(
        &self,
        locator: &Locator,
        length: usize,
        position: u64,
    ) -> Result<Vec<u8>> {
        self.range_reads.fetch_add(1, Ordering::Relaxed);

        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        let data = buckets
            .get(&locator.bucket)
            .and_then(|objects| objects.get(&locator.key))
            .ok_or_else(|| RemoteError::ObjectNotFound(locator.to_string()))?;

        slice_range(data, length, position)
    }

    async fn signed_url(&self, locator: &Locator, expires_in: Duration) -> Result<String> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        let exists = buckets
            .get(&locator.bucket)
            .is_some_and(|objects| objects.contains_key(&locator.key));
        if !exists {
            return Err(RemoteError::ObjectNotFound(locator.to_string()));
        }

        Ok(format!(
            "memory://{}/{}?expires_in={}",
            locator.bucket,
            locator.key,
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_is_sorted_and_scoped_to_bucket() {
        let store = MemoryStore::new();
        store.insert("music", "b.flac", vec![1]);
        store.insert("music", "a.flac", vec![2]);
        store.insert("other", "c.flac", vec![3]);

        assert_eq!(store.list("music").await.unwrap(), vec!["a.flac", "b.flac"]);
    }

    #[tokio::test]
    async fn unknown_bucket_fails_listing() {
        let store = MemoryStore::new();
        store.create_bucket("empty");

        assert!(store.list("empty").await.unwrap().is_empty());
        assert!(matches!(
            store.list("missing").await,
            Err(RemoteError::BucketNotFound(_))
        ));
    }

    #[tokio::test]
    async fn range_reads_are_counted() {
        let store = MemoryStore::new();
        store.insert("music", "a.flac", b"fLaC".to_vec());
        let locator = Locator::new("music", "a.flac");

        assert_eq!(store.read_range(&locator, 2, 1).await.unwrap(), b"La");
        assert!(store.read_range(&locator, 8, 0).await.unwrap_err().is_short_read());
        assert_eq!(store.range_reads(), 2);

        let missing = Locator::new("music", "nope.flac");
        assert!(matches!(
            store.read_range(&missing, 1, 0).await,
            Err(RemoteError::ObjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn signed_url_requires_existing_object() {
        let store = MemoryStore::new();
        store.insert("music", "a.flac", vec![0]);

        let url = store
            .signed_url(&Locator::new("music", "a.flac"), Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(url, "memory://music/a.flac?expires_in=900");

        assert!(store
            .signed_url(&Locator::new("music", "b.flac"), Duration::from_secs(1))
            .await
            .is_err());
    }
}
