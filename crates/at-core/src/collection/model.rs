use serde::{Deserialize, Serialize};

use crate::ids::{AnilistId, CollectionId, ItemId};

/// Label shown for collections the server returned without a name.
pub const UNTITLED_COLLECTION: &str = "Untitled";

/// Cover art URLs in decreasing resolution.
///
/// The catalog does not always fill every size, so each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

impl CoverImage {
    /// Largest available URL: extraLarge, then large, then medium.
    pub fn best(&self) -> Option<&str> {
        [&self.extra_large, &self.large, &self.medium]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

/// One anime entry stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: ItemId,
    pub anilist_id: AnilistId,
    pub anime_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,
}

impl CollectionItem {
    pub fn cover_url(&self) -> Option<&str> {
        self.cover_image.as_ref().and_then(CoverImage::best)
    }
}

/// A named, ordered group of items. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

impl Collection {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNTITLED_COLLECTION,
        }
    }

    pub fn contains_title(&self, anilist_id: AnilistId) -> bool {
        self.items.iter().any(|item| item.anilist_id == anilist_id)
    }
}

/// Request body for adding an item; the server assigns the item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionItem {
    pub anilist_id: AnilistId,
    pub anime_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,
}

/// `{message}` body returned by delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub message: String,
}
