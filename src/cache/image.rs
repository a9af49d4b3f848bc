//! Image Module
//!
//! Image-specialized cache values. The encoded payload is kept byte-for-byte;
//! decoding sniffs the container and reads its format and dimensions.

use std::io::Cursor;
use std::sync::Arc;

use ::image::ImageReader;
pub use ::image::ImageFormat;

use crate::cache::Codec;
use crate::error::{CacheError, Result};

// == Image ==
/// A decoded image: format, pixel dimensions and the original encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    format: ImageFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Parses an encoded image, keeping `data` as the payload.
    ///
    /// Any container the `image` crate recognizes is accepted (PNG, JPEG,
    /// GIF, WebP, BMP, TIFF, ICO, ...). Only headers are read; pixels are
    /// never decoded.
    pub fn decode(data: Vec<u8>) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .map_err(|err| CacheError::Decode(format!("format error: {err}")))?;

        let format = reader
            .format()
            .ok_or_else(|| CacheError::Decode("unrecognized image format".to_string()))?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|err| CacheError::Decode(format!("image header error: {err}")))?;

        if width == 0 || height == 0 {
            return Err(CacheError::Decode(format!(
                "image has empty dimensions {width}x{height}"
            )));
        }

        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Short lowercase name of the container, e.g. `png` or `webp`.
    pub fn format_name(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("unknown")
    }

    /// MIME type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded bytes exactly as supplied to [`Image::decode`].
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

// == Image Codec ==
/// Codec for the image cache. Values are shared so hits clone cheaply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    type Value = Arc<Image>;

    fn encode(&self, value: &Arc<Image>) -> Result<Vec<u8>> {
        Ok(value.data.clone())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Arc<Image>> {
        Image::decode(bytes.to_vec()).map(Arc::new)
    }

    fn cost(&self, value: &Arc<Image>) -> usize {
        value.data.len()
    }
}
