//! pixf core - extract, deduplicate and re-encode the images embedded in a document.
//!
//! # Architecture
//!
//! ```text
//! Extractor → hash → dedupe ─┬─ copy-through ─────────────┬→ image_0001.<ext> …
//!                            └─ decode → EncodePool (N) ──┘
//! ```
//!
//! Output indices are fixed by first-seen order before any worker starts,
//! so file names never depend on which encode finishes first.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixf_core::{Config, ImageExtractor};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> pixf_core::Result<()> {
//!     let config = Config::load()?;
//!     let extractor = ImageExtractor::new(&config);
//!
//!     let report = extractor
//!         .extract(Path::new("report.pdf"), Path::new("images_report"), "webp")
//!         .await?;
//!     println!("{} unique image(s)", report.written.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, ExtractError, PipelineError, PipelineResult, PixfError, Result};
pub use extract::{extractor_for, DirectoryExtractor, Extractor, PdfExtractor};
pub use pipeline::{Encoder, EncoderRegistry, ImageExtractor, OutputMode};
pub use types::{DecodedImage, ExtractedImage, ExtractionReport, RawImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_extractor_knows_both_encoders() {
        let extractor = ImageExtractor::new(&Config::default());
        assert_eq!(
            extractor.registry().format_names(),
            vec!["native", "png", "webp"]
        );
        assert!(extractor.pool().workers() >= 1);
    }
}
