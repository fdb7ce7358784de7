//! Catalog (media metadata) records.
//!
//! These are transient: they come from catalog search or detail lookups and
//! are never persisted as-is. Staging one into a collection goes through
//! [`CatalogResult::to_new_item`].

mod airing;
pub mod model;

pub use airing::AiringCountdown;
pub use model::{CatalogResult, CatalogTitle, MediaDetails, NextAiringEpisode};
