//! PICTURE block bodies.

use crate::block::BlockBounds;
use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use soul_remote::{ByteCursor, RangeRead};

/// Picture type code for "Cover (front)".
pub const FRONT_COVER: u32 = 3;

/// An embedded picture. All integer fields are big-endian on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub picture_type: u32,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub indexed_colors: u32,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl Picture {
    /// Front cover with no description or dimensions.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            picture_type: FRONT_COVER,
            mime_type: mime_type.into(),
            description: String::new(),
            width: 0,
            height: 0,
            color_depth: 0,
            indexed_colors: 0,
            data,
        }
    }

    /// Decode a picture block body.
    pub async fn read<R: RangeRead>(
        cursor: &mut ByteCursor<R>,
        bounds: &BlockBounds,
    ) -> Result<Self> {
        let picture_type = cursor.u32_be().await?;

        let mime_length = cursor.u32_be().await?;
        bounds.check_field(cursor.position(), mime_length)?;
        let mime_type = cursor.text(mime_length as usize).await?;

        let description_length = cursor.u32_be().await?;
        bounds.check_field(cursor.position(), description_length)?;
        let description = cursor.text(description_length as usize).await?;

        let width = cursor.u32_be().await?;
        let height = cursor.u32_be().await?;
        let color_depth = cursor.u32_be().await?;
        let indexed_colors = cursor.u32_be().await?;

        let data_length = cursor.u32_be().await?;
        bounds.check_field(cursor.position(), data_length)?;
        let data = cursor.bytes(data_length as usize).await?;

        Ok(Self {
            picture_type,
            mime_type,
            description,
            width,
            height,
            color_depth,
            indexed_colors,
            data,
        })
    }

    /// Image bytes as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}
