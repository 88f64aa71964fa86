//! Metadata block framing.

use crate::error::{FlacError, Result};
use soul_remote::{ByteCursor, RangeRead};
use std::fmt;

/// High bit of the header byte: this is the final metadata block.
pub const LAST_BLOCK_FLAG: u8 = 0x80;

/// Largest body a 24-bit length field can describe.
pub const MAX_BLOCK_LENGTH: u32 = 0x00FF_FFFF;

/// Metadata block types.
///
/// Only `VorbisComment` and `Picture` bodies are interpreted; every other
/// kind is skipped by its declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// Reserved or invalid type code
    Other(u8),
}

impl BlockKind {
    /// Map a 7-bit type code to a kind.
    pub fn from_code(code: u8) -> Self {
        match code & !LAST_BLOCK_FLAG {
            0 => Self::StreamInfo,
            1 => Self::Padding,
            2 => Self::Application,
            3 => Self::SeekTable,
            4 => Self::VorbisComment,
            5 => Self::CueSheet,
            6 => Self::Picture,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::StreamInfo => 0,
            Self::Padding => 1,
            Self::Application => 2,
            Self::SeekTable => 3,
            Self::VorbisComment => 4,
            Self::CueSheet => 5,
            Self::Picture => 6,
            Self::Other(code) => code & !LAST_BLOCK_FLAG,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamInfo => f.write_str("STREAMINFO"),
            Self::Padding => f.write_str("PADDING"),
            Self::Application => f.write_str("APPLICATION"),
            Self::SeekTable => f.write_str("SEEKTABLE"),
            Self::VorbisComment => f.write_str("VORBIS_COMMENT"),
            Self::CueSheet => f.write_str("CUESHEET"),
            Self::Picture => f.write_str("PICTURE"),
            Self::Other(code) => write!(f, "type {}", code),
        }
    }
}

/// The 4-byte header in front of every metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_last: bool,
    pub kind: BlockKind,
    /// Body length in bytes (24-bit)
    pub length: u32,
}

impl BlockHeader {
    /// Build a header from its first byte and the decoded length.
    pub fn from_parts(first: u8, length: u32) -> Self {
        Self {
            is_last: first & LAST_BLOCK_FLAG != 0,
            kind: BlockKind::from_code(first),
            length,
        }
    }

    /// Read one header: flag/type byte, then a big-endian 24-bit length.
    pub async fn read<R: RangeRead>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let first = cursor.u8().await?;
        let length = cursor.u24().await?;
        Ok(Self::from_parts(first, length))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        let flag = if self.is_last { LAST_BLOCK_FLAG } else { 0 };
        let [_, a, b, c] = (self.length & MAX_BLOCK_LENGTH).to_be_bytes();
        [flag | self.kind.code(), a, b, c]
    }
}

/// Where the body of the block being decoded must end.
#[derive(Debug, Clone, Copy)]
pub struct BlockBounds {
    pub kind: BlockKind,
    pub start: u64,
    pub end: u64,
}

impl BlockBounds {
    pub fn new(header: &BlockHeader, start: u64) -> Self {
        Self {
            kind: header.kind,
            start,
            end: start + u64::from(header.length),
        }
    }

    /// Fail before reading a length-prefixed field that would overrun the block.
    ///
    /// Keeps a corrupt inner length from turning into a huge fetch.
    pub fn check_field(&self, position: u64, length: u32) -> Result<()> {
        let field_end = position + u64::from(length);
        if field_end > self.end {
            return Err(FlacError::FramingMismatch {
                kind: self.kind,
                expected: self.end,
                actual: field_end,
            });
        }
        Ok(())
    }

    /// The framing check run after every block body.
    pub fn check_end(&self, position: u64) -> Result<()> {
        if position != self.end {
            return Err(FlacError::FramingMismatch {
                kind: self.kind,
                expected: self.end,
                actual: position,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for code in 0..=127u8 {
            assert_eq!(BlockKind::from_code(code).code(), code);
        }
        assert_eq!(BlockKind::from_code(4), BlockKind::VorbisComment);
        assert_eq!(BlockKind::from_code(6), BlockKind::Picture);
        assert_eq!(BlockKind::from_code(127), BlockKind::Other(127));
    }

    #[test]
    fn header_flag_and_type_split() {
        let header = BlockHeader::from_parts(0x84, 10);
        assert!(header.is_last);
        assert_eq!(header.kind, BlockKind::VorbisComment);

        let header = BlockHeader::from_parts(0x06, 10);
        assert!(!header.is_last);
        assert_eq!(header.kind, BlockKind::Picture);
    }

    #[test]
    fn header_bytes_are_big_endian() {
        let header = BlockHeader {
            is_last: true,
            kind: BlockKind::Padding,
            length: 0x010203,
        };
        assert_eq!(header.to_bytes(), [0x81, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn bounds_checks() {
        let header = BlockHeader::from_parts(0x04, 20);
        let bounds = BlockBounds::new(&header, 8);

        assert_eq!(bounds.end, 28);
        assert!(bounds.check_end(28).is_ok());
        assert!(bounds.check_field(12, 16).is_ok());
        assert!(matches!(
            bounds.check_field(12, 17),
            Err(FlacError::FramingMismatch {
                expected: 28,
                actual: 29,
                ..
            })
        ));
        assert!(matches!(
            bounds.check_end(27),
            Err(FlacError::FramingMismatch { actual: 27, .. })
        ));
    }
}
