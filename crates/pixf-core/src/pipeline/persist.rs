//! Writing final bytes to deterministically named files.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// Extension assumed for copy-through blobs whose name has none.
const DEFAULT_EXTENSION: &str = "png";

/// Writes `image_%04d.<ext>` files into one output directory.
#[derive(Debug, Clone)]
pub struct Persister {
    dir: PathBuf,
}

impl Persister {
    /// Create the output directory if needed. An existing directory is fine.
    pub fn create(dir: &Path) -> PipelineResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for the zero-based output index (1-based in the file name).
    pub fn path_for(&self, index: usize, extension: &str) -> PathBuf {
        self.dir.join(format!("image_{:04}.{}", index + 1, extension))
    }

    /// Write `bytes` as image number `index`.
    pub fn write(&self, index: usize, extension: &str, bytes: &[u8]) -> PipelineResult<PathBuf> {
        let path = self.path_for(index, extension);
        std::fs::write(&path, bytes).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::trace!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Extension to keep for a copy-through blob: the source's, lower-cased.
pub fn native_extension(source_name: &str) -> String {
    Path::new(source_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
