//! Metadata-only FLAC fixtures for exercising a bucket.

use crate::error::{IndexerError, Result};
use soul_flac_meta::{MetadataWriter, Picture};
use soul_remote::DEFAULT_MIN_CHUNK_SIZE;
use std::path::Path;
use tracing::info;

/// Contents of a fixture file.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub vendor: String,
    /// Raw `KEY=VALUE` comment entries
    pub tags: Vec<String>,
    pub cover: Option<Picture>,
    /// Zero bytes after the metadata. The default fills one fetch chunk so
    /// the fixture indexes with the default configuration.
    pub audio_bytes: usize,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            vendor: format!("soul-bucket-indexer {}", env!("CARGO_PKG_VERSION")),
            tags: Vec::new(),
            cover: None,
            audio_bytes: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}

/// Check a `KEY=VALUE` argument.
pub fn parse_tag(raw: &str) -> Result<String> {
    match raw.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(raw.to_string()),
        _ => Err(IndexerError::InvalidTag(raw.to_string())),
    }
}

/// MIME type for a cover image, from its extension.
pub fn image_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

impl Fixture {
    /// Load a front cover from an image file.
    pub async fn with_cover_file(mut self, path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        self.cover = Some(Picture::new(image_mime_type(path), data));
        Ok(self)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = MetadataWriter::new()
            .stream_info()
            .vorbis_comment(&self.vendor, &self.tags);
        if let Some(ref cover) = self.cover {
            writer = writer.picture(cover);
        }
        writer.audio_bytes(self.audio_bytes).to_bytes()
    }

    /// Write the fixture, creating parent directories.
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = self.to_bytes();
        tokio::fs::write(path, &bytes).await?;

        info!(
            "Wrote fixture {} ({} tags, cover: {}, {} bytes)",
            path.display(),
            self.tags.len(),
            self.cover.is_some(),
            bytes.len()
        );
        Ok(())
    }
}
