//! Delayed catalog query trigger shared by every search box.

use std::sync::Arc;
use std::time::Duration;

use at_core::ports::CatalogPort;
use at_core::{CatalogResult, FetchError, Operation};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

pub type SearchResult = Result<Vec<CatalogResult>, FetchError>;

/// What an update did to the pending search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryUpdate {
    /// A search for the new query runs once the quiet period elapses.
    Scheduled,
    /// The query was blank; nothing is pending and results should be cleared.
    Cleared,
}

/// A search that ran to completion.
#[derive(Debug)]
pub struct SettledSearch {
    pub query: String,
    pub result: SearchResult,
}

struct PendingSearch {
    query: String,
    handle: JoinHandle<SearchResult>,
}

/// Collapses a stream of query edits into at most one catalog search per
/// quiet period.
///
/// Each [`update`](Self::update) aborts the previously scheduled search and
/// starts a fresh timer. Dropping the debouncer aborts whatever is pending, so
/// a search never completes into an owner that no longer exists.
pub struct SearchDebouncer {
    catalog: Arc<dyn CatalogPort>,
    quiet_period: Duration,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    pub fn new(catalog: Arc<dyn CatalogPort>, quiet_period: Duration) -> Self {
        Self {
            catalog,
            quiet_period,
            pending: None,
        }
    }

    pub fn with_default_period(catalog: Arc<dyn CatalogPort>) -> Self {
        Self::new(catalog, DEFAULT_QUIET_PERIOD)
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Replaces the pending query.
    ///
    /// Blank queries never reach the catalog.
    pub fn update(&mut self, query: &str) -> QueryUpdate {
        self.cancel();

        let query = query.trim();
        if query.is_empty() {
            return QueryUpdate::Cleared;
        }

        let deadline = Instant::now() + self.quiet_period;
        let catalog = Arc::clone(&self.catalog);
        let owned = query.to_string();
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!(query = %owned, "debounced search firing");
            catalog.search(&owned).await
        });

        self.pending = Some(PendingSearch {
            query: query.to_string(),
            handle,
        });
        QueryUpdate::Scheduled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_query(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.query.as_str())
    }

    /// Aborts the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            debug!(query = %pending.query, "pending search cancelled");
        }
    }

    /// Waits for the pending search to finish.
    ///
    /// Returns `None` right away when nothing is pending. Cancel safe: if this
    /// future is dropped the search stays pending.
    pub async fn settled(&mut self) -> Option<SettledSearch> {
        let pending = self.pending.as_mut()?;
        let joined = (&mut pending.handle).await;
        let pending = self.pending.take()?;

        let result = joined.unwrap_or_else(|e| {
            Err(FetchError::transport(
                Operation::CatalogSearch,
                format!("search task ended abnormally: {}", e),
            ))
        });
        Some(SettledSearch {
            query: pending.query,
            result,
        })
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
