//! Infrastructure adapters for Anime Tracker: the collection API and catalog
//! clients over `reqwest`, and the TOML configuration loader.

pub mod config;
pub mod http;

pub use config::load_config;
pub use http::{AnilistCatalog, HttpCollectionStore, DEFAULT_CATALOG_ENDPOINT};
