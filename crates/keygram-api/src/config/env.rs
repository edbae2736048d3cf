//! Config loading from environment variables

use std::path::{Path, PathBuf};

use keygram::KeygramConfig;

use super::constants::{DEFAULT_BIND_ADDR, ENV_BIND_ADDR, ENV_CONFIG_PATH};
use crate::errors::ApiError;

/// API Server Configuration
#[derive(Debug, Clone)]
pub struct Config {
  /// Bind address (e.g. "127.0.0.1:5530")
  pub bind_addr: String,
  /// Path of the keygram configuration file, if one was given
  pub config_path: Option<PathBuf>,
  /// Extraction engine configuration
  pub keygram: KeygramConfig,
}

impl Config {
  /// Loads configuration from environment variables
  ///
  /// - `KEYGRAM_API_BIND_ADDR`: bind address (default `127.0.0.1:5530`)
  /// - `KEYGRAM_CONFIG`: path to a keygram JSON config (defaults are used when unset)
  ///
  /// # Errors
  /// Returns an error if the config file cannot be read or is invalid
  pub fn from_env() -> crate::errors::Result<Self> {
    let bind_addr =
      std::env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let config_path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);

    Self::from_parts(bind_addr, config_path)
  }

  /// Builds the configuration from explicit values
  ///
  /// # Errors
  /// Returns an error if the config file cannot be read or is invalid
  pub fn from_parts(
    bind_addr: impl Into<String>,
    config_path: Option<PathBuf>,
  ) -> crate::errors::Result<Self> {
    let keygram = match &config_path {
      Some(path) => load_keygram_config(path)?,
      None => KeygramConfig::default(),
    };

    Ok(Self {
      bind_addr: bind_addr.into(),
      config_path,
      keygram,
    })
  }
}

fn load_keygram_config(path: &Path) -> crate::errors::Result<KeygramConfig> {
  let config = KeygramConfig::from_path(path).map_err(|e| ApiError::config(e.to_string()))?;
  config.validate().map_err(|e| ApiError::config(e.to_string()))?;
  Ok(config)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use keygram::Language;
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn from_parts_without_file_uses_defaults() {
    let config = Config::from_parts("127.0.0.1:0", None).unwrap();
    assert_eq!(config.bind_addr, "127.0.0.1:0");
    assert!(config.config_path.is_none());
    assert_eq!(config.keygram.supported_languages(), &[Language::En]);
  }

  #[test]
  fn from_parts_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keygram.json");
    fs::write(&path, r#"{ "scoring": { "limit": 3 } }"#).unwrap();

    let config = Config::from_parts(DEFAULT_BIND_ADDR, Some(path)).unwrap();
    assert_eq!(config.keygram.default_limit(), 3);
  }

  #[test]
  fn from_parts_rejects_missing_file() {
    let err = Config::from_parts(DEFAULT_BIND_ADDR, Some("/nonexistent/keygram.json".into()))
      .unwrap_err();
    assert_eq!(err.code(), "config_error");
  }

  #[test]
  fn from_parts_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keygram.json");
    fs::write(&path, r#"{ "generator": { "max_width": 0 } }"#).unwrap();

    let err = Config::from_parts(DEFAULT_BIND_ADDR, Some(path)).unwrap_err();
    assert_eq!(err.code(), "config_error");
  }

  #[test]
  fn config_from_env_defaults() {
    // Note: remove_var became unsafe in Rust 2024, so not used here
    // If KEYGRAM_CONFIG points to a broken file this test reports it
    let config = Config::from_env().unwrap();
    assert!(!config.bind_addr.is_empty());
  }
}
