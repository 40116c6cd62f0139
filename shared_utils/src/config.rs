//! TOML configuration loading.
//!
//! Configuration structs live with the crate that owns them; this module only
//! knows how to turn a file or a string into one of them.

use std::{fs, path::Path};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The configuration content is not valid TOML for the target type.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parses a configuration value from a TOML string.
pub fn load_toml_str<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Reads and parses a TOML configuration file.
///
/// # Arguments
/// * `path` - Path to the TOML file.
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_toml_str(&content)
}
