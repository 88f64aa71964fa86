//! Object store collaborator interface.

use crate::error::Result;
use crate::locator::Locator;
use crate::range::RangeRead;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A bucket-organised, range-addressable object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List object keys in a bucket (a single page, no pagination).
    async fn list(&self, bucket: &str) -> Result<Vec<String>>;

    /// Read exactly `length` bytes of an object starting at `position`.
    async fn read_range(&self, locator: &Locator, length: usize, position: u64)
        -> Result<Vec<u8>>;

    /// Time-limited URL an outside player can fetch the object from.
    async fn signed_url(&self, locator: &Locator, expires_in: Duration) -> Result<String>;
}

/// [`RangeRead`] bound to one object of a store.
#[derive(Clone)]
pub struct ObjectReader {
    store: Arc<dyn ObjectStore>,
    locator: Locator,
}

impl ObjectReader {
    pub fn new(store: Arc<dyn ObjectStore>, locator: Locator) -> Self {
        Self { store, locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

#[async_trait]
impl RangeRead for ObjectReader {
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
        self.store.read_range(&self.locator, length, position).await
    }
}
