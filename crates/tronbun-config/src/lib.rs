//! Helper-process configuration.
//!
//! Every section has defaults, so the helpers run with no config file at
//! all. A TOML file can override the IPC limits, the initial window and
//! the tray defaults.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{HelperConfig, IpcConfig, TrayConfig, WindowConfig};

use std::path::Path;

use tronbun_common::ConfigError;

/// Load the config from an explicit path, or from the platform default
/// location when `path` is `None`.
///
/// A missing default file yields the defaults. A missing explicit file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<HelperConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_with_missing_explicit_path_fails() {
        let result = load_config(Some(Path::new("/tmp/nonexistent_tronbun_helper.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn load_config_with_explicit_path_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helper.toml");
        std::fs::write(&path, "[window]\ntitle = \"Docs\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.window.title, "Docs");
        assert_eq!(config.ipc.max_command_length, 32768);
    }
}
