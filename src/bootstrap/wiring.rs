//! # Dependency wiring
//!
//! Builds the concrete adapters from configuration and hands them out as
//! port trait objects. Nothing here decides what to do with them.

use std::sync::Arc;
use std::time::Duration;

use at_app::{QuickSearch, SearchDebouncer, SelectionController};
use at_core::ports::{CatalogPort, CollectionStorePort, NoticePort};
use at_core::AppConfig;
use at_infra::{AnilistCatalog, HttpCollectionStore};
use tracing::debug;

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors while constructing adapters
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Collection API client initialization failed: {0}")]
    CollectionStore(String),

    #[error("Catalog client initialization failed: {0}")]
    Catalog(String),
}

/// Ports shared by every command.
pub struct AppServices {
    pub store: Arc<dyn CollectionStorePort>,
    pub catalog: Arc<dyn CatalogPort>,
    pub notices: Arc<dyn NoticePort>,
    pub debounce: Duration,
}

impl AppServices {
    pub fn controller(&self) -> SelectionController {
        SelectionController::new(Arc::clone(&self.store), Arc::clone(&self.notices))
    }

    /// A fresh debouncer; each search box owns its own.
    pub fn debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(Arc::clone(&self.catalog), self.debounce)
    }

    pub fn quick_search(&self) -> QuickSearch {
        QuickSearch::new(self.debouncer())
    }
}

/// Expects `config` to have been through
/// [`apply_defaults`](super::config::apply_defaults).
pub fn wire(config: &AppConfig, notices: Arc<dyn NoticePort>) -> WiringResult<AppServices> {
    let token = Some(config.api_auth_token.clone()).filter(|t| !t.is_empty());
    let store = HttpCollectionStore::new(&config.api_base_url, token)
        .map_err(|e| WiringError::CollectionStore(format!("{e:#}")))?;
    let catalog = AnilistCatalog::new(&config.catalog_endpoint, config.catalog_page_size)
        .map_err(|e| WiringError::Catalog(format!("{e:#}")))?;

    debug!(
        api = %config.api_base_url,
        catalog = %config.catalog_endpoint,
        authenticated = !config.api_auth_token.is_empty(),
        "adapters wired"
    );

    Ok(AppServices {
        store: Arc::new(store),
        catalog: Arc::new(catalog),
        notices,
        debounce: Duration::from_millis(config.search_debounce_ms),
    })
}
