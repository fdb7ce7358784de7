//! Collections and the items they hold, as returned by the remote store.

pub mod model;

pub use model::{
    Collection, CollectionItem, CoverImage, DeleteConfirmation, NewCollectionItem,
    UNTITLED_COLLECTION,
};
