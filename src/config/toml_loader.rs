//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load and deserialize a TOML file.
///
/// Returns `Ok(None)` when the file does not exist so callers can decide
/// whether absence is fatal.
///
/// # Type Parameters
///
/// - `T`: Target type to deserialize the document into
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read and
/// [`ConfigError::InvalidSyntax`] if it is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::InvalidSyntax {
            file: path.display().to_string(),
            message: e.message().to_string(),
        })
}
