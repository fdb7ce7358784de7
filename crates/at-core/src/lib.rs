//! # at-core
//!
//! Core domain models, error taxonomy and port interfaces for Anime Tracker.
//!
//! This crate contains pure data and contracts without any infrastructure
//! dependencies.

pub mod catalog;
pub mod collection;
pub mod config;
pub mod errors;
pub mod ids;
pub mod ports;
pub mod selection;

// Re-export commonly used types at the crate root
pub use catalog::{AiringCountdown, CatalogResult, CatalogTitle, MediaDetails};
pub use collection::{
    Collection, CollectionItem, CoverImage, DeleteConfirmation, NewCollectionItem,
};
pub use config::AppConfig;
pub use errors::{CollectionError, FetchError, Operation, ValidationError};
pub use ids::{AnilistId, CollectionId, ItemId};
pub use selection::{SelectionSnapshot, SelectionState};
