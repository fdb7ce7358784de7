//! Locating the config file and filling in defaults.
//!
//! The file itself is read by [`at_infra::load_config`], which takes values
//! as they are. Everything left empty there is defaulted here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use at_core::AppConfig;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "ANIME_TRACKER_CONFIG";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

const APP_DIR_NAME: &str = "anime-tracker";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Picks the config path: the explicit flag, then the environment variable,
/// then `<config dir>/anime-tracker/config.toml`.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    env_value: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| config_dir.map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
}

/// Fills every empty field with its default.
pub fn apply_defaults(mut config: AppConfig) -> AppConfig {
    if config.api_base_url.trim().is_empty() {
        config.api_base_url = DEFAULT_API_BASE_URL.to_string();
    }
    if config.catalog_endpoint.trim().is_empty() {
        config.catalog_endpoint = at_infra::DEFAULT_CATALOG_ENDPOINT.to_string();
    }
    if config.catalog_page_size == 0 {
        config.catalog_page_size = DEFAULT_PAGE_SIZE;
    }
    if config.search_debounce_ms == 0 {
        config.search_debounce_ms = DEFAULT_DEBOUNCE_MS;
    }
    config
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file was read; `looked_at` is the default location, if any.
    Defaults { looked_at: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

impl ResolvedConfig {
    /// Records where the config came from.
    ///
    /// Config is read before the subscriber exists, so this is called once
    /// tracing is up rather than logging during the load.
    pub fn log_source(&self) {
        match &self.source {
            ConfigSource::File(path) => info!(path = %path.display(), "config loaded"),
            ConfigSource::Defaults { looked_at: Some(path) } => {
                debug!(path = %path.display(), "no config file, using defaults")
            }
            ConfigSource::Defaults { looked_at: None } => {
                debug!("no config directory, using defaults")
            }
        }
    }
}

/// Loads the effective configuration.
///
/// A missing file at the default location is not an error; a missing file
/// the user named explicitly is.
pub fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<ResolvedConfig> {
    let env_value = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty());
    let required = explicit.is_some() || env_value.is_some();
    let path = resolve_config_path(explicit, env_value, dirs::config_dir());
    load_from(path.as_deref(), required)
}

fn load_from(path: Option<&Path>, required: bool) -> anyhow::Result<ResolvedConfig> {
    let (raw, source) = match path {
        Some(path) if path.exists() || required => {
            let raw = at_infra::load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (raw, ConfigSource::File(path.to_path_buf()))
        }
        looked_at => (
            AppConfig::default(),
            ConfigSource::Defaults {
                looked_at: looked_at.map(Path::to_path_buf),
            },
        ),
    };
    Ok(ResolvedConfig {
        config: apply_defaults(raw),
        source,
    })
}
