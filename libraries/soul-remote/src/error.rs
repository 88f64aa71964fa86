//! Error types for remote object access.

use thiserror::Error;

/// Errors raised while listing or reading remote objects.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// A range read returned fewer bytes than requested
    #[error("Short read at offset {position}: requested {requested} bytes, received {received}")]
    ShortRead {
        position: u64,
        requested: usize,
        received: usize,
    },

    /// Bucket does not exist
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Object does not exist
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Remote end answered with an unexpected status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// URL could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O error from a local store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemoteError {
    /// Whether this error means the object ended before the requested range.
    pub fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. })
    }
}

/// Result type for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
