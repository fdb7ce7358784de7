use async_trait::async_trait;

use crate::collection::{Collection, CollectionItem, DeleteConfirmation, NewCollectionItem};
use crate::errors::FetchError;
use crate::ids::{CollectionId, ItemId};

/// Remote collection resource.
///
/// Every call is exactly one network round trip with credentials attached and
/// returns canonical server state. Nothing is retried here.
#[async_trait]
pub trait CollectionStorePort: Send + Sync {
    async fn list(&self) -> Result<Vec<Collection>, FetchError>;

    /// The returned collection carries the server-assigned id and no items.
    async fn create(&self, name: &str) -> Result<Collection, FetchError>;

    /// Only the `name` of the returned record is meaningful.
    async fn rename(&self, id: CollectionId, name: &str) -> Result<Collection, FetchError>;

    /// Not idempotent: removing an already-deleted id fails with HTTP 404.
    async fn remove(&self, id: CollectionId) -> Result<DeleteConfirmation, FetchError>;

    /// Duplicate `anilist_id` handling is left to the server.
    async fn add_item(
        &self,
        collection_id: CollectionId,
        item: &NewCollectionItem,
    ) -> Result<CollectionItem, FetchError>;

    async fn remove_item(
        &self,
        collection_id: CollectionId,
        item_id: ItemId,
    ) -> Result<DeleteConfirmation, FetchError>;
}

#[cfg(any(test, feature = "testing"))]
mockall::mock! {
    pub CollectionStore {}

    #[async_trait]
    impl CollectionStorePort for CollectionStore {
        async fn list(&self) -> Result<Vec<Collection>, FetchError>;
        async fn create(&self, name: &str) -> Result<Collection, FetchError>;
        async fn rename(&self, id: CollectionId, name: &str) -> Result<Collection, FetchError>;
        async fn remove(&self, id: CollectionId) -> Result<DeleteConfirmation, FetchError>;
        async fn add_item(
            &self,
            collection_id: CollectionId,
            item: &NewCollectionItem,
        ) -> Result<CollectionItem, FetchError>;
        async fn remove_item(
            &self,
            collection_id: CollectionId,
            item_id: ItemId,
        ) -> Result<DeleteConfirmation, FetchError>;
    }
}
