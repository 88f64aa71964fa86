//! Error types for bucket scans.

use soul_remote::RemoteError;
use thiserror::Error;

/// Errors that abort a whole scan.
///
/// Failures of individual objects never surface here; they are recorded in
/// [`crate::ScanStats::failures`] and the scan carries on.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The bucket could not be listed
    #[error("Failed to list bucket {bucket}: {source}")]
    Listing {
        bucket: String,
        #[source]
        source: RemoteError,
    },

    /// Configuration rejected by validation
    #[error("Invalid scan configuration: {0}")]
    Config(String),

    /// A worker task panicked or was aborted
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
