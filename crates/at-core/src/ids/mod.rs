//! ID type wrappers for type safety.
//!
//! Collections, items and catalog entries are all keyed by plain integers on
//! the wire. Wrapping them keeps a catalog id from being passed where a
//! server-assigned item id is expected.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_numeric_id;

/// Server-assigned collection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(i64);

/// Server-assigned identifier of one item inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

/// Catalog (AniList) media identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnilistId(i64);

impl_numeric_id!(CollectionId, ItemId, AnilistId);
