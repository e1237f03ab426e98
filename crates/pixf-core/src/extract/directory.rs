//! Reads loose image files from a directory.

use std::path::Path;
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::types::ExtractedImage;

use super::Extractor;

/// Extensions treated as images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Treats every image file directly inside a directory as one extracted
/// image, in file-name order.
#[derive(Debug, Default)]
pub struct DirectoryExtractor;

impl DirectoryExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl Extractor for DirectoryExtractor {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn extract_all(&self, document: &Path) -> Result<Vec<ExtractedImage>, ExtractError> {
        let mut images = Vec::new();
        for entry in WalkDir::new(document)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ExtractError::Read {
                path: document.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !Self::is_image(path) {
                continue;
            }
            let bytes = std::fs::read(path).map_err(|source| ExtractError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            images.push(ExtractedImage::new(
                entry.file_name().to_string_lossy().into_owned(),
                bytes,
            ));
        }
        tracing::debug!("Read {} image file(s) from {:?}", images.len(), document);
        Ok(images)
    }
}
