//! Encoding of FLAC metadata regions.
//!
//! Produces `fLaC` followed by metadata blocks, with the last-block flag set
//! on the final one. Used for fixtures; no audio frames are encoded, though
//! [`MetadataWriter::audio_bytes`] can pad the object to a realistic size.

use crate::block::{BlockHeader, BlockKind, MAX_BLOCK_LENGTH};
use crate::decoder::SIGNATURE;
use crate::picture::Picture;

struct PendingBlock {
    kind: BlockKind,
    body: Vec<u8>,
    declared_length: Option<u32>,
}

/// Builder for a metadata-only FLAC byte stream.
///
/// ```
/// use soul_flac_meta::{MetadataWriter, Picture};
///
/// let bytes = MetadataWriter::new()
///     .stream_info()
///     .vorbis_comment("soul", ["TITLE=Intro", "ARTIST=Someone"])
///     .picture(&Picture::new("image/png", vec![1, 2, 3]))
///     .to_bytes();
/// assert_eq!(&bytes[..4], b"fLaC");
/// ```
#[derive(Default)]
pub struct MetadataWriter {
    blocks: Vec<PendingBlock>,
    audio_bytes: usize,
}

impl MetadataWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// STREAMINFO for 44.1 kHz, 16-bit stereo with an unknown sample count.
    pub fn stream_info(self) -> Self {
        let mut body = Vec::with_capacity(34);
        body.extend_from_slice(&4096u16.to_be_bytes()); // min block size
        body.extend_from_slice(&4096u16.to_be_bytes()); // max block size
        body.extend_from_slice(&[0; 3]); // min frame size
        body.extend_from_slice(&[0; 3]); // max frame size

        // 20 bits rate | 3 bits channels-1 | 5 bits bps-1 | 36 bits samples
        let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36);
        body.extend_from_slice(&packed.to_be_bytes());
        body.extend_from_slice(&[0; 16]); // MD5

        self.raw_block(BlockKind::StreamInfo, body)
    }

    pub fn padding(self, length: usize) -> Self {
        self.raw_block(BlockKind::Padding, vec![0; length])
    }

    /// VORBIS_COMMENT block from raw `KEY=VALUE` entries.
    pub fn vorbis_comment<I, S>(self, vendor: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<S> = entries.into_iter().collect();

        let mut body = Vec::new();
        body.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        body.extend_from_slice(vendor.as_bytes());
        body.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for entry in &entries {
            let entry = entry.as_ref().as_bytes();
            body.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            body.extend_from_slice(entry);
        }

        self.raw_block(BlockKind::VorbisComment, body)
    }

    pub fn picture(self, picture: &Picture) -> Self {
        let mut body = Vec::new();
        body.extend_from_slice(&picture.picture_type.to_be_bytes());
        body.extend_from_slice(&(picture.mime_type.len() as u32).to_be_bytes());
        body.extend_from_slice(picture.mime_type.as_bytes());
        body.extend_from_slice(&(picture.description.len() as u32).to_be_bytes());
        body.extend_from_slice(picture.description.as_bytes());
        body.extend_from_slice(&picture.width.to_be_bytes());
        body.extend_from_slice(&picture.height.to_be_bytes());
        body.extend_from_slice(&picture.color_depth.to_be_bytes());
        body.extend_from_slice(&picture.indexed_colors.to_be_bytes());
        body.extend_from_slice(&(picture.data.len() as u32).to_be_bytes());
        body.extend_from_slice(&picture.data);

        self.raw_block(BlockKind::Picture, body)
    }

    /// Append a block with an arbitrary body.
    pub fn raw_block(mut self, kind: BlockKind, body: Vec<u8>) -> Self {
        self.blocks.push(PendingBlock {
            kind,
            body,
            declared_length: None,
        });
        self
    }

    /// Append a block whose header claims `declared_length` regardless of
    /// the body actually written.
    pub fn raw_block_with_length(mut self, kind: BlockKind, body: Vec<u8>, declared_length: u32) -> Self {
        self.blocks.push(PendingBlock {
            kind,
            body,
            declared_length: Some(declared_length),
        });
        self
    }

    /// Zero bytes appended after the metadata, standing in for audio frames.
    pub fn audio_bytes(mut self, length: usize) -> Self {
        self.audio_bytes = length;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(SIGNATURE.as_bytes());

        let count = self.blocks.len();
        for (index, block) in self.blocks.iter().enumerate() {
            let header = BlockHeader {
                is_last: index + 1 == count,
                kind: block.kind,
                length: block
                    .declared_length
                    .unwrap_or(block.body.len() as u32)
                    .min(MAX_BLOCK_LENGTH),
            };
            out.extend_from_slice(&header.to_bytes());
            out.extend_from_slice(&block.body);
        }

        out.resize(out.len() + self.audio_bytes, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_final_block_is_flagged() {
        let bytes = MetadataWriter::new().padding(2).padding(3).to_bytes();

        assert_eq!(&bytes[..4], b"fLaC");
        assert_eq!(&bytes[4..8], &[0x01, 0, 0, 2]);
        assert_eq!(&bytes[10..14], &[0x81, 0, 0, 3]);
        assert_eq!(bytes.len(), 4 + 4 + 2 + 4 + 3);
    }

    #[test]
    fn stream_info_is_34_bytes() {
        let bytes = MetadataWriter::new().stream_info().to_bytes();
        assert_eq!(&bytes[4..8], &[0x80, 0, 0, 34]);
        assert_eq!(bytes.len(), 4 + 4 + 34);
        // 44100 Hz in the top 20 bits of the packed field
        assert_eq!(&bytes[18..21], &[0x0A, 0xC4, 0x42]);
    }

    #[test]
    fn comment_lengths_are_little_endian() {
        let bytes = MetadataWriter::new()
            .vorbis_comment("ab", ["K=V"])
            .to_bytes();
        let body = &bytes[8..];

        assert_eq!(&body[..4], &[2, 0, 0, 0]);
        assert_eq!(&body[4..6], b"ab");
        assert_eq!(&body[6..10], &[1, 0, 0, 0]);
        assert_eq!(&body[10..14], &[3, 0, 0, 0]);
        assert_eq!(&body[14..], b"K=V");
    }

    #[test]
    fn audio_bytes_follow_metadata() {
        let bytes = MetadataWriter::new().padding(0).audio_bytes(10).to_bytes();
        assert_eq!(bytes.len(), 4 + 4 + 10);
    }
}
