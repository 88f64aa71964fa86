//! VORBIS_COMMENT block bodies.
//!
//! Unlike the surrounding FLAC framing, every length in here is a
//! little-endian 32-bit integer.

use crate::block::BlockBounds;
use crate::error::{FlacError, Result};
use crate::track::Tags;
use soul_remote::{ByteCursor, RangeRead};

/// Split a `KEY=VALUE` entry on its first `=`, lower-casing the key.
pub fn parse_entry(entry: &str) -> Result<(String, String)> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| FlacError::MalformedEntry(entry.to_string()))?;
    Ok((key.to_lowercase(), value.to_string()))
}

/// Decode a comment block body into `tags`.
///
/// The vendor string is consumed and dropped. Later entries overwrite
/// earlier ones with the same (case-folded) key.
pub async fn read_vorbis_comment<R: RangeRead>(
    cursor: &mut ByteCursor<R>,
    bounds: &BlockBounds,
    tags: &mut Tags,
) -> Result<()> {
    bounds.check_field(cursor.position(), 4)?;
    let vendor_length = cursor.u32_le().await?;
    bounds.check_field(cursor.position(), vendor_length)?;
    cursor.skip(vendor_length as usize).await?;

    bounds.check_field(cursor.position(), 4)?;
    let entry_count = cursor.u32_le().await?;
    for _ in 0..entry_count {
        bounds.check_field(cursor.position(), 4)?;
        let entry_length = cursor.u32_le().await?;
        bounds.check_field(cursor.position(), entry_length)?;

        let entry = cursor.text(entry_length as usize).await?;
        let (key, value) = parse_entry(&entry)?;
        tags.insert(key, value);
    }

    Ok(())
}
