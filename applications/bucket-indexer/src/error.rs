/// Indexer error types
use soul_bucket_scan::ScanError;
use soul_flac_meta::FlacError;
use soul_remote::RemoteError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tag {0:?}: expected KEY=VALUE")]
    InvalidTag(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Decode failed: {0}")]
    Decode(#[from] FlacError),

    #[error("Store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
