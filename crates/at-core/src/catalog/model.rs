use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{CoverImage, NewCollectionItem};
use crate::ids::AnilistId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTitle {
    #[serde(default)]
    pub romaji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

impl CatalogTitle {
    /// English title when the catalog has one, romaji otherwise.
    pub fn display(&self) -> &str {
        match self.english.as_deref() {
            Some(english) if !english.trim().is_empty() => english,
            _ => &self.romaji,
        }
    }
}

/// One hit from a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResult {
    pub id: AnilistId,
    pub title: CatalogTitle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,
}

impl CatalogResult {
    pub fn display_title(&self) -> &str {
        self.title.display()
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_image.as_ref().and_then(CoverImage::best)
    }

    pub fn to_new_item(&self) -> NewCollectionItem {
        NewCollectionItem {
            anilist_id: self.id,
            anime_title: self.display_title().to_string(),
            cover_image: self.cover_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAiringEpisode {
    /// Unix timestamp in seconds.
    pub airing_at: i64,
}

impl NextAiringEpisode {
    pub fn airing_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.airing_at, 0)
    }
}

/// Full metadata for a single title, as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    pub id: AnilistId,
    pub title: CatalogTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub next_airing_episode: Option<NextAiringEpisode>,
}

impl MediaDetails {
    pub fn display_title(&self) -> &str {
        self.title.display()
    }

    pub fn to_new_item(&self) -> NewCollectionItem {
        NewCollectionItem {
            anilist_id: self.id,
            anime_title: self.display_title().to_string(),
            cover_image: self.cover_image.clone(),
        }
    }
}
