//! Image decoding with content-based format detection.

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{DecodedImage, RawImage};

/// Decodes raw blobs into RGBA pixel buffers.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode a raw image into straight-alpha RGBA.
    ///
    /// The format is sniffed from the bytes, so a misnamed blob still decodes.
    /// A failure here only concerns this one image; callers skip it.
    pub fn decode(&self, raw: &RawImage) -> Result<DecodedImage, PipelineError> {
        let name = raw.source_name();
        let reader = ImageReader::new(Cursor::new(raw.bytes()))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            name: name.to_string(),
            message: "unrecognized image format".to_string(),
        })?;
        tracing::trace!("Decoding {} as {}", name, format_to_string(format));

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let max_dim = self.limits.max_image_dimension;
        if image.width() > max_dim || image.height() > max_dim {
            return Err(PipelineError::Decode {
                name: name.to_string(),
                message: format!(
                    "image too large ({}x{} > {})",
                    image.width(),
                    image.height(),
                    max_dim
                ),
            });
        }

        Ok(DecodedImage {
            pixels: into_rgba(image),
            digest: raw.digest(),
        })
    }
}

/// Normalize to RGBA8, reusing the buffer when it already is RGBA8.
fn into_rgba(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(buffer) => buffer,
        other => other.to_rgba8(),
    }
}

/// Short lowercase name for a detected format, for logs.
pub fn format_to_string(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        _ => "unknown",
    }
}
