//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::pipeline::EncoderRegistry;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.max_idle_buffers == 0 {
            return Err(ConfigError::ValidationError(
                "pool.max_idle_buffers must be > 0".into(),
            ));
        }
        if self.pool.max_buffer_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "pool.max_buffer_capacity must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if EncoderRegistry::default()
            .resolve(&self.output.default_format)
            .is_err()
        {
            return Err(ConfigError::ValidationError(format!(
                "output.default_format '{}' is not one of: {}",
                self.output.default_format,
                EncoderRegistry::default().format_names().join(", ")
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level '{}' is not one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format '{}' is not one of: {}",
                self.logging.format,
                LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}
