//! Soul Bucket Indexer Library
//!
//! Command-line front end for `soul-bucket-scan`: configuration, listing
//! output, single-object inspection and fixture generation.
//!
//! This library exposes the pieces behind the binary for testing purposes.

pub mod config;
pub mod error;
pub mod fixture;
pub mod inspect;
pub mod report;

pub use config::{IndexerConfig, StoreSettings};
pub use error::{IndexerError, Result};
pub use fixture::Fixture;
pub use inspect::inspect;
pub use report::{render_table, render_tags, rows_with_urls, TrackRow};
