//! # Configuration Loader
//!
//! Reads the TOML file and maps it onto [`AppConfig`]. Whatever is in the
//! file is accepted; defaults are applied by the bootstrap layer.

use anyhow::Context;
use at_core::AppConfig;
use std::path::Path;

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or holds a
/// number that does not fit its field.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid value in config file: {}", config_path.display()))
}
