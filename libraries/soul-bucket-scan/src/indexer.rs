/// Bucket indexing: discovery and fetching wired together
use crate::config::ScanConfig;
use crate::discovery::DiscoveryProducer;
use crate::error::Result;
use crate::pool::FetchWorkerPool;
use crate::progress::{ScanProgress, ScanStats};
use crate::queue::WorkQueue;
use crate::sink::{TrackCollection, TrackSink};
use soul_flac_meta::Track;
use soul_remote::ObjectStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Indexes every matching object of a bucket into a [`TrackSink`].
///
/// # Example
///
/// ```rust,no_run
/// use soul_bucket_scan::{BucketIndexer, ScanConfig};
/// use soul_remote::LocalStore;
/// use std::sync::Arc;
///
/// # async fn example() -> soul_bucket_scan::Result<()> {
/// let store = Arc::new(LocalStore::new("/srv/buckets"));
/// let indexer = BucketIndexer::new(store, ScanConfig::default());
///
/// let (tracks, stats) = indexer.collect("music").await?;
/// println!("{} tracks, {} failures", tracks.len(), stats.failed());
/// # Ok(())
/// # }
/// ```
pub struct BucketIndexer {
    store: Arc<dyn ObjectStore>,
    config: ScanConfig,
    progress: Option<mpsc::Sender<ScanProgress>>,
    cancel: CancellationToken,
}

impl BucketIndexer {
    pub fn new(store: Arc<dyn ObjectStore>, config: ScanConfig) -> Self {
        Self {
            store,
            config,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Send progress events to `progress`.
    ///
    /// The channel is bounded; the receiver must keep draining it or the
    /// workers stall.
    pub fn with_progress(mut self, progress: mpsc::Sender<ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Token that stops a running [`BucketIndexer::index`] when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Index `bucket`, publishing each decoded track to `sink`.
    ///
    /// Workers start before discovery so they are already polling when the
    /// first locator is queued. A listing failure is returned once every
    /// worker has exited; per-object failures only show up in the stats.
    pub async fn index(&self, bucket: &str, sink: Arc<dyn TrackSink>) -> Result<ScanStats> {
        self.config.validate()?;

        info!(
            "Indexing bucket {} with {} workers",
            bucket, self.config.workers
        );
        self.send(ScanProgress::Started {
            bucket: bucket.to_string(),
            workers: self.config.workers,
        })
        .await;

        let queue = WorkQueue::new();
        let mut pool = FetchWorkerPool::new(Arc::clone(&self.store), sink, &self.config)
            .with_cancellation(self.cancel.clone());
        if let Some(ref tx) = self.progress {
            pool = pool.with_progress(tx.clone());
        }
        let handle = pool.spawn(queue.clone());

        let producer = DiscoveryProducer::new(
            Arc::clone(&self.store),
            bucket,
            self.config.extension.clone(),
        );
        let discovered = producer.run(&queue).await;
        if let Ok(objects) = &discovered {
            self.send(ScanProgress::Discovered { objects: *objects })
                .await;
        }

        let mut stats = handle.join().await?;
        stats.discovered = discovered?;

        info!(
            "Indexed bucket {}: {} tracks, {} failed{}",
            bucket,
            stats.decoded,
            stats.failed(),
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        self.send(ScanProgress::Completed {
            stats: stats.clone(),
        })
        .await;

        Ok(stats)
    }

    /// Index `bucket` into a fresh collection, returned in listing order.
    pub async fn collect(&self, bucket: &str) -> Result<(Vec<Track>, ScanStats)> {
        let tracks = TrackCollection::new();
        let stats = self.index(bucket, Arc::new(tracks.clone())).await?;
        Ok((tracks.sorted(), stats))
    }

    async fn send(&self, event: ScanProgress) {
        if let Some(ref tx) = self.progress {
            let _ = tx.send(event).await;
        }
    }
}
