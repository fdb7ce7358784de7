//! Navigation-bar search: type, wait for results, jump to a title.

use at_core::{AnilistId, CatalogResult, FetchError};
use tracing::{debug, warn};

use crate::debounce::{QueryUpdate, SearchDebouncer};

pub struct QuickSearch {
    search: SearchDebouncer,
    query: String,
    results: Vec<CatalogResult>,
}

impl QuickSearch {
    pub fn new(search: SearchDebouncer) -> Self {
        Self {
            search,
            query: String::new(),
            results: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[CatalogResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.search.is_pending()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.search.update(&self.query) == QueryUpdate::Cleared {
            self.results.clear();
        }
    }

    /// Waits for the pending search; `None` if nothing is pending.
    pub async fn settle(&mut self) -> Option<Result<&[CatalogResult], FetchError>> {
        let settled = self.search.settled().await?;
        match settled.result {
            Ok(results) => {
                debug!(query = %settled.query, hits = results.len(), "quick search settled");
                self.results = results;
                Some(Ok(&self.results))
            }
            Err(e) => {
                warn!(query = %settled.query, error = %e, "quick search failed");
                Some(Err(e))
            }
        }
    }

    /// Picks a result to navigate to and resets the box.
    pub fn choose(&mut self, result: &CatalogResult) -> AnilistId {
        self.search.cancel();
        self.query.clear();
        self.results.clear();
        result.id
    }
}
