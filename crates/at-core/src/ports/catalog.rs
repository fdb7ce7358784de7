use async_trait::async_trait;

use crate::catalog::{CatalogResult, MediaDetails};
use crate::errors::FetchError;
use crate::ids::AnilistId;

/// External media catalog (search and detail lookups).
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Ordered hits for a free-text query; one page, no pagination.
    async fn search(&self, query: &str) -> Result<Vec<CatalogResult>, FetchError>;

    async fn details(&self, id: AnilistId) -> Result<MediaDetails, FetchError>;
}

#[cfg(any(test, feature = "testing"))]
mockall::mock! {
    pub Catalog {}

    #[async_trait]
    impl CatalogPort for Catalog {
        async fn search(&self, query: &str) -> Result<Vec<CatalogResult>, FetchError>;
        async fn details(&self, id: AnilistId) -> Result<MediaDetails, FetchError>;
    }
}
