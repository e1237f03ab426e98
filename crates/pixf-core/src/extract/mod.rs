//! Extractors: the collaborators that pull raw image blobs out of a document.
//!
//! The pipeline only needs one call, [`Extractor::extract_all`], returning
//! every embedded image as a named byte blob in encounter order.

mod directory;
mod pdf;

pub use directory::DirectoryExtractor;
pub use pdf::PdfExtractor;

use std::path::Path;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::types::ExtractedImage;

/// Source of raw image blobs.
pub trait Extractor: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Return every embedded image of `document`, in encounter order.
    fn extract_all(&self, document: &Path) -> Result<Vec<ExtractedImage>, ExtractError>;
}

/// Pick an extractor for `input`: directories are read as loose image
/// files, anything else is parsed as a PDF.
pub fn extractor_for(input: &Path) -> Result<Arc<dyn Extractor>, ExtractError> {
    if !input.exists() {
        return Err(ExtractError::NotFound(input.to_path_buf()));
    }
    let extractor: Arc<dyn Extractor> = if input.is_dir() {
        Arc::new(DirectoryExtractor::new())
    } else {
        Arc::new(PdfExtractor::new())
    };
    tracing::debug!("Using {} extractor for {:?}", extractor.name(), input);
    Ok(extractor)
}
