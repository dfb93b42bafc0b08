//! Upload validation.
//!
//! An upload is accepted once it has been fully decoded. The decoded raster is
//! kept so formats the model service cannot take directly can be re-encoded
//! without touching the original bytes again.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use std::fmt;
use std::io::Cursor;

use crate::{Error, Result};

/// Upload size advertised to clients. Not enforced; any decodable image is accepted.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const SUPPORTED_FORMATS: [&str; 4] = ["JPG", "JPEG", "PNG", "GIF"];

/// Image bytes in a form the model service accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

pub struct ValidatedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    image: DynamicImage,
}

impl ValidatedImage {
    pub fn decode(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Empty file uploaded".to_string()));
        }

        let format = image::guess_format(&bytes).map_err(invalid_format)?;
        let image = image::load_from_memory_with_format(&bytes, format).map_err(invalid_format)?;

        Ok(Self { bytes, format, image })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Original bytes when the format can be sent as-is, a PNG re-encode otherwise.
    pub fn inline_payload(&self) -> Result<InlineImage> {
        if let Some(mime_type) = native_mime_type(self.format) {
            return Ok(InlineImage {
                mime_type,
                data: self.bytes.clone(),
            });
        }

        let mut data = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut data), ImageOutputFormat::Png)?;
        Ok(InlineImage {
            mime_type: "image/png",
            data,
        })
    }
}

impl fmt::Debug for ValidatedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("ValidatedImage")
            .field("format", &self.format)
            .field("width", &width)
            .field("height", &height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

fn native_mime_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

fn invalid_format(err: image::ImageError) -> Error {
    Error::InvalidInput(format!("Invalid image format: {}", err))
}
