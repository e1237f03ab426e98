//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Output directory and format settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix for the derived output directory (`<prefix><document stem>`)
    pub dir_prefix: String,

    /// Format used when none is given: "native", "png" or "webp"
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_prefix: "images_".to_string(),
            default_format: "native".to_string(),
        }
    }
}

/// Encode pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of encode workers; 0 uses the available parallelism
    pub workers: usize,

    /// Idle buffers kept for reuse between encodes
    pub max_idle_buffers: usize,

    /// Buffers that grew beyond this many bytes are dropped instead of reused
    pub max_buffer_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            max_idle_buffers: 32,
            max_buffer_capacity: 64 * 1024 * 1024,
        }
    }
}

impl PoolConfig {
    /// Resolve the configured worker count, falling back to the number of
    /// hardware execution units.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image dimension (width or height) accepted for conversion
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 20000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
