//! Soul FLAC Metadata
//!
//! Decodes the metadata region at the head of a FLAC object without
//! downloading the audio frames behind it.
//!
//! Reads go through a [`soul_remote::ByteCursor`], so a decode costs one
//! range request for most files: the default 128 KiB chunk covers typical
//! comment and cover blocks.
//!
//! # Example
//!
//! ```rust
//! use soul_flac_meta::{read_track, MetadataWriter};
//! use soul_remote::{Locator, MemoryStore, ObjectReader};
//! use std::sync::Arc;
//!
//! # async fn example() -> soul_flac_meta::Result<()> {
//! let bytes = MetadataWriter::new()
//!     .stream_info()
//!     .vorbis_comment("", ["TITLE=Intro", "ARTIST=Someone"])
//!     .to_bytes();
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert("music", "a.flac", bytes);
//!
//! let locator = Locator::new("music", "a.flac");
//! let reader = ObjectReader::new(store, locator.clone());
//! let track = read_track(locator, reader, 64).await?;
//! assert_eq!(track.title(), Some("Intro"));
//! # Ok(())
//! # }
//! ```

mod block;
mod comment;
mod decoder;
mod error;
mod picture;
mod track;
pub mod writer;

pub use block::{BlockBounds, BlockHeader, BlockKind, LAST_BLOCK_FLAG, MAX_BLOCK_LENGTH};
pub use comment::{parse_entry, read_vorbis_comment};
pub use decoder::{read_track, FlacMetadataDecoder, SIGNATURE};
pub use error::{FlacError, Result};
pub use picture::{Picture, FRONT_COVER};
pub use track::{compare_for_listing, sort_for_listing, Tags, Track};
pub use writer::MetadataWriter;
