//! Per-card catalog lookups for the next episode's airing time.

use at_core::ports::CatalogPort;
use at_core::AiringCountdown;
use chrono::{DateTime, Utc};
use tracing::{debug, info_span, warn, Instrument};

use crate::list_reconciler::ItemCard;

/// Looks up each card's title in the catalog and returns its countdown, in
/// card order.
///
/// A failed lookup yields `None` for that card only; the card still renders
/// from the stored item.
pub async fn next_airing(
    cards: &[ItemCard<'_>],
    catalog: &dyn CatalogPort,
    now: DateTime<Utc>,
) -> Vec<Option<AiringCountdown>> {
    let span = info_span!("usecase.list.next_airing", cards = cards.len());
    async {
        let mut countdowns = Vec::with_capacity(cards.len());
        for card in cards {
            let countdown = match catalog.details(card.anilist_id).await {
                Ok(details) => details
                    .next_airing_episode
                    .and_then(|next| next.airing_time())
                    .and_then(|at| AiringCountdown::until(at, now)),
                Err(e) => {
                    warn!(anilist_id = %card.anilist_id, error = %e, "catalog lookup for card failed");
                    None
                }
            };
            debug!(anilist_id = %card.anilist_id, airing = ?countdown, "card looked up");
            countdowns.push(countdown);
        }
        countdowns
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_core::catalog::model::NextAiringEpisode;
    use at_core::ports::MockCatalog;
    use at_core::{AnilistId, CatalogTitle, FetchError, ItemId, MediaDetails, Operation};

    const NOW: i64 = 1_700_000_000;

    fn card(item_id: i64, anilist_id: i64, title: &str) -> ItemCard<'_> {
        ItemCard {
            item_id: ItemId::new(item_id),
            anilist_id: AnilistId::new(anilist_id),
            title,
            cover_url: None,
        }
    }

    fn airing_in(id: AnilistId, secs: Option<i64>) -> MediaDetails {
        MediaDetails {
            id,
            title: CatalogTitle {
                romaji: "Frieren".to_string(),
                english: None,
            },
            description: None,
            season: None,
            season_year: None,
            genres: Vec::new(),
            episodes: None,
            cover_image: None,
            next_airing_episode: secs.map(|s| NextAiringEpisode { airing_at: NOW + s }),
        }
    }

    #[tokio::test]
    async fn failed_lookup_only_blanks_its_own_card() {
        let mut catalog = MockCatalog::new();
        catalog.expect_details().times(3).returning(|id| match id.get() {
            1 => Ok(airing_in(id, Some(3 * 24 * 3600))),
            2 => Err(FetchError::status(Operation::CatalogDetails, 404, "Not Found.")),
            _ => Ok(airing_in(id, None)),
        });
        let cards = vec![card(10, 1, "Frieren"), card(11, 2, "Gone"), card(12, 3, "Finished")];
        let now = DateTime::from_timestamp(NOW, 0).unwrap();

        let countdowns = next_airing(&cards, &catalog, now).await;

        assert_eq!(countdowns, vec![Some(AiringCountdown::Days(3)), None, None]);
    }

    #[tokio::test]
    async fn no_cards_means_no_lookups() {
        let mut catalog = MockCatalog::new();
        catalog.expect_details().never();
        let now = DateTime::from_timestamp(NOW, 0).unwrap();

        assert!(next_airing(&[], &catalog, now).await.is_empty());
    }
}
