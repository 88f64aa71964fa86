//! Soul Bucket Scan
//!
//! Indexes the FLAC objects of a bucket by reading only their metadata
//! blocks.
//!
//! A [`DiscoveryProducer`] lists the bucket and fills a [`WorkQueue`]; a
//! [`FetchWorkerPool`] drains it concurrently, decoding each object with
//! `soul-flac-meta` and publishing the resulting tracks to a [`TrackSink`].
//! [`BucketIndexer`] runs both for one bucket and returns [`ScanStats`].
//!
//! A failure on one object is logged and counted, never fatal. Only a
//! failed listing aborts the scan.

mod config;
mod discovery;
mod error;
mod indexer;
mod pool;
mod progress;
mod queue;
mod sink;

pub use config::ScanConfig;
pub use discovery::DiscoveryProducer;
pub use error::{Result, ScanError};
pub use indexer::BucketIndexer;
pub use pool::{FetchWorkerPool, PoolHandle, CANCELLED};
pub use progress::{ScanProgress, ScanStats};
pub use queue::{Pop, WorkQueue};
pub use sink::{TrackCollection, TrackSink};
