//! Port interfaces for the application layer
//!
//! Ports define the contract between the controllers in `at-app` and the
//! adapters in `at-infra` (HTTP) or the front end (notices). Controllers only
//! ever see these traits.

pub mod catalog;
pub mod collection_store;
pub mod notice;

pub use catalog::CatalogPort;
pub use collection_store::CollectionStorePort;
pub use notice::{Notice, NoticeLevel, NoticePort};

#[cfg(any(test, feature = "testing"))]
pub use catalog::MockCatalog;
#[cfg(any(test, feature = "testing"))]
pub use collection_store::MockCollectionStore;
#[cfg(any(test, feature = "testing"))]
pub use notice::MockNotices;
