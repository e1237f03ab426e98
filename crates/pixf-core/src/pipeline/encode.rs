//! Lossless output encoders and the format registry.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::collections::HashMap;

use crate::error::PipelineError;
use crate::types::DecodedImage;

/// Format keys that select copy-through instead of an encoder.
const NATIVE_KEYS: &[&str] = &["native", "original", ""];

/// Target encodings. Both are lossless and keep the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    /// PNG tuned for write speed: fastest deflate, no row filtering
    Png,
    /// Lossless WebP
    WebP,
}

impl Encoder {
    /// Format key used to select this encoder.
    pub fn key(&self) -> &'static str {
        match self {
            Encoder::Png => "png",
            Encoder::WebP => "webp",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.key()
    }

    /// Encode `image` into `out`. `out` is appended to, not cleared.
    pub fn encode(&self, image: &DecodedImage, out: &mut Vec<u8>) -> image::ImageResult<()> {
        let (width, height) = image.pixels.dimensions();
        let data = image.pixels.as_raw();
        match self {
            Encoder::Png => {
                PngEncoder::new_with_quality(out, CompressionType::Fast, FilterType::NoFilter)
                    .write_image(data, width, height, ExtendedColorType::Rgba8)
            }
            Encoder::WebP => WebPEncoder::new_lossless(out).write_image(
                data,
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
        }
    }
}

/// How unique images are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Original bytes, original extension
    CopyThrough,
    /// Decode and re-encode
    Convert(Encoder),
}

impl OutputMode {
    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::CopyThrough => "native",
            OutputMode::Convert(encoder) => encoder.key(),
        }
    }

    /// Encoder used in conversion mode.
    pub fn encoder(&self) -> Option<Encoder> {
        match self {
            OutputMode::CopyThrough => None,
            OutputMode::Convert(encoder) => Some(*encoder),
        }
    }
}

/// Mapping from format key to encoder, built once at startup and passed
/// into the pipeline.
#[derive(Debug, Clone)]
pub struct EncoderRegistry {
    encoders: HashMap<String, Encoder>,
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Encoder::Png);
        registry.register(Encoder::WebP);
        registry
    }
}

impl EncoderRegistry {
    /// A registry with no encoders; only copy-through resolves.
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    pub fn register(&mut self, encoder: Encoder) {
        self.encoders.insert(encoder.key().to_string(), encoder);
    }

    /// Resolve a user-supplied format key (case-insensitive).
    pub fn resolve(&self, format: &str) -> Result<OutputMode, PipelineError> {
        let key = format.trim().to_lowercase();
        if NATIVE_KEYS.contains(&key.as_str()) {
            return Ok(OutputMode::CopyThrough);
        }
        self.encoders
            .get(&key)
            .copied()
            .map(OutputMode::Convert)
            .ok_or(PipelineError::UnsupportedFormat(key))
    }

    /// All accepted keys, sorted, with "native" first.
    pub fn format_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.encoders.keys().cloned().collect();
        names.sort();
        names.insert(0, "native".to_string());
        names
    }
}
