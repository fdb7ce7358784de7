//! Projection from the selected collection to what the main list renders.

use at_core::{AnilistId, Collection, ItemId};

/// One rendered collection entry. Everything is read from the stored item,
/// never from a catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard<'a> {
    pub item_id: ItemId,
    pub anilist_id: AnilistId,
    pub title: &'a str,
    pub cover_url: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    NoSelection,
    /// Cards in the order the server returned the items.
    Items {
        collection: &'a Collection,
        cards: Vec<ItemCard<'a>>,
    },
}

impl ListView<'_> {
    /// True for a selected collection that has no items yet.
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, ListView::Items { cards, .. } if cards.is_empty())
    }
}

pub fn reconcile_list(selected: Option<&Collection>, is_loading: bool) -> ListView<'_> {
    if is_loading {
        return ListView::Loading;
    }
    let Some(collection) = selected else {
        return ListView::NoSelection;
    };

    let cards = collection
        .items
        .iter()
        .map(|item| ItemCard {
            item_id: item.id,
            anilist_id: item.anilist_id,
            title: &item.anime_title,
            cover_url: item.cover_url(),
        })
        .collect();
    ListView::Items { collection, cards }
}
