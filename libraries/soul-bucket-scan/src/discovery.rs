/// Bucket discovery
use crate::error::{Result, ScanError};
use crate::queue::WorkQueue;
use soul_remote::{Locator, ObjectStore};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Lists a bucket and feeds matching objects to the work queue.
pub struct DiscoveryProducer {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    extension: String,
}

impl DiscoveryProducer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            extension: extension.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Keys ending with the extension, in listing order.
    pub async fn discover(&self) -> Result<Vec<Locator>> {
        let keys = self
            .store
            .list(&self.bucket)
            .await
            .map_err(|source| ScanError::Listing {
                bucket: self.bucket.clone(),
                source,
            })?;

        let total = keys.len();
        let locators: Vec<Locator> = keys
            .into_iter()
            .filter(|key| key.ends_with(&self.extension))
            .map(|key| Locator::new(self.bucket.clone(), key))
            .collect();

        debug!(
            bucket = %self.bucket,
            listed = total,
            matched = locators.len(),
            "Listed bucket"
        );

        Ok(locators)
    }

    /// Push every match onto `queue`, then close it.
    ///
    /// The queue is closed on failure too, so workers always terminate.
    pub async fn run(&self, queue: &WorkQueue) -> Result<usize> {
        let locators = match self.discover().await {
            Ok(locators) => locators,
            Err(e) => {
                error!("Discovery failed: {}", e);
                queue.close().await;
                return Err(e);
            }
        };

        let count = locators.len();
        for locator in locators {
            queue.push(locator).await;
        }
        queue.close().await;

        info!("Discovered {} objects in bucket {}", count, self.bucket);
        Ok(count)
    }
}
