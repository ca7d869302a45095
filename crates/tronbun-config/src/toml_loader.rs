//! TOML config file loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tronbun_common::ConfigError;

use crate::schema::HelperConfig;

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults.
pub fn load_from_path(path: &Path) -> Result<HelperConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: HelperConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform default path, or defaults if there is
/// no file there. The helpers never create the file.
pub fn load_default() -> Result<HelperConfig, ConfigError> {
    let path = match default_config_path() {
        Ok(p) => p,
        Err(e) => {
            debug!("no config directory ({e}), using defaults");
            return Ok(HelperConfig::default());
        }
    };

    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(HelperConfig::default());
    }

    load_from_path(&path)
}

/// `~/.config/tronbun/helper.toml` on Linux,
/// `~/Library/Application Support/tronbun/helper.toml` on macOS.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("tronbun").join("helper.toml"))
}
