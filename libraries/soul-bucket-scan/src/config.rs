use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use soul_remote::DEFAULT_MIN_CHUNK_SIZE;
use std::time::Duration;

/// Tuning for discovery and the fetch worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Smallest range requested per round trip, in bytes
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// How long an idle worker sleeps before polling the queue again
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Key suffix selecting objects to index (case-sensitive)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Lifetime of signed playback URLs
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
}

fn default_workers() -> usize {
    4
}

fn default_min_chunk_size() -> usize {
    DEFAULT_MIN_CHUNK_SIZE
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_extension() -> String {
    ".flac".to_string()
}

fn default_signed_url_ttl_secs() -> u64 {
    3600
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            min_chunk_size: default_min_chunk_size(),
            poll_interval_ms: default_poll_interval_ms(),
            extension: default_extension(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
        }
    }
}

impl ScanConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    /// Reject settings the pool cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScanError::Config("workers must be at least 1".to_string()));
        }
        if self.min_chunk_size == 0 {
            return Err(ScanError::Config(
                "min_chunk_size must be at least 1 byte".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(ScanError::Config("extension must not be empty".to_string()));
        }
        Ok(())
    }
}
