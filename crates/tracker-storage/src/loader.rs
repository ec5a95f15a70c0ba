//! Reads a storage document from disk.
//!
//! The decoder is chosen from the file extension: `.yaml` / `.yml` for YAML
//! (the usual format for tracker deployments) and `.toml` for TOML. Loading
//! never applies defaults; callers run [`RedisConfig::apply_defaults`] once
//! on the block they use.
//!
//! [`RedisConfig::apply_defaults`]: crate::config::RedisConfig::apply_defaults

use std::path::Path;

use tracing::debug;

use crate::config::{ConfigError, StorageConfig};

/// Document formats accepted by [`load_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Maps a file extension to its format. Matching ignores ASCII case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Loads a [`StorageConfig`] from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for unknown extensions,
/// [`ConfigError::Io`] if the file cannot be read, and
/// [`ConfigError::Yaml`] / [`ConfigError::Toml`] for malformed content.
pub fn load_config(path: impl AsRef<Path>) -> Result<StorageConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), ?format, "read storage config");

    match format {
        ConfigFormat::Yaml => StorageConfig::from_yaml_str(&content),
        ConfigFormat::Toml => StorageConfig::from_toml_str(&content),
    }
}
