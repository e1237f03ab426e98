//! Core data types for the pixf extraction pipeline.
//!
//! A blob travels through the pipeline as `ExtractedImage` (straight from the
//! document), then `RawImage` (hashed), and, in conversion mode,
//! `DecodedImage` (RGBA pixels).

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::pipeline::hash::{ContentHasher, Digest};

/// One embedded image as returned by an extractor.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Name the extractor gave the blob (carries the native extension)
    pub name: String,
    /// Raw encoded bytes
    pub bytes: Vec<u8>,
}

impl ExtractedImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// An extracted blob together with its content digest.
///
/// Built once per blob by the loader and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RawImage {
    source_name: String,
    bytes: Vec<u8>,
    digest: Digest,
}

impl RawImage {
    /// Hash the blob and wrap it.
    pub fn load(extracted: ExtractedImage) -> Self {
        let digest = ContentHasher::hash(&extracted.bytes);
        Self {
            source_name: extracted.name,
            bytes: extracted.bytes,
            digest,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }
}

/// Decoded pixels in straight-alpha RGBA8, ready for encoding.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel buffer (width × height × 4 bytes)
    pub pixels: RgbaImage,
    /// Digest of the raw bytes this image was decoded from
    pub digest: Digest,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Summary of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Directory the images were written to
    pub output_dir: PathBuf,

    /// "native" for copy-through, otherwise the encoder's format key
    pub mode: String,

    /// Blobs returned by the extractor
    pub extracted: usize,

    /// Blobs dropped because an earlier blob had the same digest
    pub duplicates_skipped: usize,

    /// Unique blobs that could not be decoded (conversion mode only)
    pub decode_failures: usize,

    /// Files written to the output directory
    pub written: Vec<PathBuf>,
}

impl ExtractionReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    /// Pretty-printed JSON form, as printed by `pixf extract --json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_image_keeps_name_and_bytes() {
        let raw = RawImage::load(ExtractedImage::new("Im0.jpg", vec![1, 2, 3]));
        assert_eq!(raw.source_name(), "Im0.jpg");
        assert_eq!(raw.bytes(), &[1, 2, 3]);
        assert_eq!(raw.digest(), ContentHasher::hash(&[1, 2, 3]));
    }

    #[test]
    fn test_report_serializes() {
        let report = ExtractionReport {
            output_dir: PathBuf::from("images_doc"),
            mode: "png".into(),
            extracted: 4,
            duplicates_skipped: 1,
            decode_failures: 0,
            written: vec![PathBuf::from("images_doc/image_0001.png")],
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"duplicates_skipped\": 1"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["written"][0], "images_doc/image_0001.png");
        assert_eq!(report.written_count(), 1);
    }
}
