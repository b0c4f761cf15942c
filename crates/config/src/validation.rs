//! Configuration validation
//!
//! Rejects settings the logger cannot run with:
//! - Empty base path
//! - Zero file size limit

use crate::error::{ConfigError, Result};
use crate::logger::LoggerConfig;

/// Validate the logger configuration
pub fn validate_config(config: &LoggerConfig) -> Result<()> {
    validate_path(config)?;
    validate_rotation(config)?;
    Ok(())
}

fn validate_path(config: &LoggerConfig) -> Result<()> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::invalid_value("path", "must not be empty"));
    }
    Ok(())
}

fn validate_rotation(config: &LoggerConfig) -> Result<()> {
    if config.max_file_size == 0 {
        return Err(ConfigError::invalid_value(
            "max_file_size",
            "must be greater than zero",
        ));
    }
    Ok(())
}
