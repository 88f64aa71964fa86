/// FLAC metadata decoding over a byte cursor
use crate::block::{BlockBounds, BlockHeader, BlockKind};
use crate::comment::read_vorbis_comment;
use crate::error::{FlacError, Result};
use crate::picture::Picture;
use crate::track::{Tags, Track};
use soul_remote::{ByteCursor, Locator, RangeRead};
use tracing::debug;

/// Stream marker at offset 0 of every FLAC file.
pub const SIGNATURE: &str = "fLaC";

/// Decodes the metadata region of one FLAC object into a [`Track`].
///
/// Walks blocks until the one flagged last, collecting Vorbis comments into
/// tags and keeping the most recent picture as the cover. After each block
/// the cursor must sit exactly `length` bytes past the header; anything else
/// aborts with [`FlacError::FramingMismatch`].
pub struct FlacMetadataDecoder<'a, R> {
    cursor: &'a mut ByteCursor<R>,
    locator: Locator,
    tags: Tags,
    cover: Option<String>,
}

impl<'a, R: RangeRead> FlacMetadataDecoder<'a, R> {
    /// Create a decoder for `locator` reading from a cursor at offset 0.
    pub fn new(locator: Locator, cursor: &'a mut ByteCursor<R>) -> Self {
        Self {
            cursor,
            locator,
            tags: Tags::new(),
            cover: None,
        }
    }

    /// Run the decode to completion.
    pub async fn decode(mut self) -> Result<Track> {
        let found = self.cursor.text(SIGNATURE.len()).await?;
        if found != SIGNATURE {
            return Err(FlacError::BadSignature { found });
        }

        loop {
            let header = BlockHeader::read(self.cursor).await?;
            let bounds = BlockBounds::new(&header, self.cursor.position());

            debug!(
                locator = %self.locator,
                kind = %header.kind,
                length = header.length,
                last = header.is_last,
                "Metadata block"
            );

            self.decode_body(&header, &bounds).await?;
            bounds.check_end(self.cursor.position())?;

            if header.is_last {
                break;
            }
        }

        debug!(
            locator = %self.locator,
            tags = self.tags.len(),
            cover = self.cover.is_some(),
            fetches = self.cursor.fetch_count(),
            "Decoded metadata"
        );

        Ok(Track {
            locator: self.locator,
            tags: self.tags,
            cover: self.cover,
        })
    }

    async fn decode_body(&mut self, header: &BlockHeader, bounds: &BlockBounds) -> Result<()> {
        match header.kind {
            BlockKind::VorbisComment => {
                read_vorbis_comment(self.cursor, bounds, &mut self.tags).await?;
            }
            BlockKind::Picture => {
                let picture = Picture::read(self.cursor, bounds).await?;
                self.cover = Some(picture.to_data_uri());
            }
            _ => self.cursor.skip(header.length as usize).await?,
        }
        Ok(())
    }
}

/// Decode the object behind `reader`, fetching at least `min_chunk_size`
/// bytes per range read.
pub async fn read_track<R: RangeRead>(
    locator: Locator,
    reader: R,
    min_chunk_size: usize,
) -> Result<Track> {
    let mut cursor = ByteCursor::with_chunk_size(reader, min_chunk_size);
    FlacMetadataDecoder::new(locator, &mut cursor).decode().await
}
