//! Error types for the pixf extraction pipeline.
//!
//! Errors are organized by stage so a failure always names the document,
//! image, or output path it concerns.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pixf operations.
#[derive(Error, Debug)]
pub enum PixfError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document could not be turned into raw images
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of the collaborator that pulls raw image blobs out of a document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input path does not exist
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    /// Reading the document or one of its image files failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF container could not be parsed
    #[error("Failed to parse PDF {path}: {source}")]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// The PDF is encrypted and could not be unlocked with the empty password
    #[error("Cannot unlock encrypted PDF {path}: {source}")]
    Locked {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// The extraction thread panicked or was cancelled
    #[error("Extraction task failed for {path}: {message}")]
    Task { path: PathBuf, message: String },
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image bytes could not be decoded (non-fatal, the image is skipped)
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// No encoder is registered for the requested output format
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Encoding one image failed (fatal to the batch)
    #[error("Encode error for image #{index}: {message}")]
    Encode { index: usize, message: String },

    /// Creating the output directory or writing a file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pool worker panicked or was cancelled
    #[error("Encode worker failed: {0}")]
    Worker(String),
}

impl PipelineError {
    /// Whether the error only affects a single image and the batch may continue.
    pub fn is_skippable(&self) -> bool {
        matches!(self, PipelineError::Decode { .. })
    }
}

/// Convenience type alias for pixf results.
pub type Result<T> = std::result::Result<T, PixfError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
