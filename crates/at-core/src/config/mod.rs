//! # Pure Data Module - Data Transfer Objects Only
//!
//! Maps the TOML configuration file onto [`AppConfig`]. No defaults and no
//! validation live here: an empty string or a zero is recorded as-is and the
//! bootstrap layer decides what it means.

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Collection API origin, e.g. `http://localhost:3000`
    pub api_base_url: String,

    /// Bearer token attached to collection API requests (may be empty)
    pub api_auth_token: String,

    /// Catalog GraphQL endpoint
    pub catalog_endpoint: String,

    /// Results per catalog search
    pub catalog_page_size: u32,

    /// Quiet period before a typed query is searched
    pub search_debounce_ms: u64,

    /// Directory for rolling log files (empty disables file logging)
    pub log_directory: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// Missing sections and keys map to empty strings and zeros.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
        };

        Ok(Self {
            api_base_url: str_at("api", "base_url"),
            api_auth_token: str_at("api", "auth_token"),
            catalog_endpoint: str_at("catalog", "endpoint"),
            catalog_page_size: u32::try_from(int_at("catalog", "page_size"))?,
            search_debounce_ms: u64::try_from(int_at("search", "debounce_ms"))?,
            log_directory: str_at("logging", "directory"),
        })
    }
}
