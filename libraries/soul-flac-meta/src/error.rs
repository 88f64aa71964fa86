/// FLAC metadata decoding errors
use crate::block::BlockKind;
use soul_remote::RemoteError;
use thiserror::Error;

/// Result type alias using `FlacError`
pub type Result<T> = std::result::Result<T, FlacError>;

/// Errors that abort decoding of a single object
#[derive(Error, Debug)]
pub enum FlacError {
    /// The object ended before a requested range
    #[error("Short read at offset {position}: requested {requested} bytes, received {received}")]
    ShortRead {
        position: u64,
        requested: usize,
        received: usize,
    },

    /// The first four bytes are not `fLaC`
    #[error("Not a FLAC stream: expected signature \"fLaC\", found {found:?}")]
    BadSignature { found: String },

    /// A block body did not end where its header said it would
    #[error("Framing mismatch in {kind} block: expected end at offset {expected}, got {actual}")]
    FramingMismatch {
        kind: BlockKind,
        expected: u64,
        actual: u64,
    },

    /// A comment entry has no `=` delimiter
    #[error("Malformed comment entry: {0:?}")]
    MalformedEntry(String),

    /// Any other failure of the range-read collaborator
    #[error(transparent)]
    Remote(RemoteError),
}

impl From<RemoteError> for FlacError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::ShortRead {
                position,
                requested,
                received,
            } => Self::ShortRead {
                position,
                requested,
                received,
            },
            other => Self::Remote(other),
        }
    }
}
