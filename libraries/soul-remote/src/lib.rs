//! Soul Remote
//!
//! Byte-level access to objects held in a range-addressable store.
//!
//! This crate provides:
//! - [`RangeRead`]: the "read `length` bytes at `position`" seam
//! - [`ByteCursor`]: a lazy, buffering, typed token reader on top of it
//! - [`ObjectStore`]: bucket listing, range reads and signed URLs
//! - Reference stores: [`MemoryStore`], [`LocalStore`] and an
//!   [`HttpRangeReader`] for single URLs
//!
//! # Example
//!
//! ```rust
//! use soul_remote::{ByteCursor, Locator, MemoryStore, ObjectReader};
//! use std::sync::Arc;
//!
//! # async fn example() -> soul_remote::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! store.insert("music", "a.flac", b"fLaC\x80\x00\x00\x00".to_vec());
//!
//! let reader = ObjectReader::new(store, Locator::new("music", "a.flac"));
//! let mut cursor = ByteCursor::with_chunk_size(reader, 8);
//! assert_eq!(cursor.text(4).await?, "fLaC");
//! assert_eq!(cursor.u8().await?, 0x80);
//! # Ok(())
//! # }
//! ```

mod cursor;
mod error;
mod http;
mod local;
mod locator;
mod memory;
mod range;
mod store;

pub use cursor::{ByteCursor, DEFAULT_MIN_CHUNK_SIZE};
pub use error::{RemoteError, Result};
pub use http::HttpRangeReader;
pub use local::LocalStore;
pub use locator::Locator;
pub use memory::MemoryStore;
pub use range::{range_fn, slice_range, FnRangeRead, RangeRead};
pub use store::{ObjectReader, ObjectStore};
