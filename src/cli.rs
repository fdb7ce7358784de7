//! Command-line front end over the collection controller and catalog.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use at_app::{next_airing, ListView, SelectionController, ToggleOutcome};
use at_core::{
    AiringCountdown, AnilistId, CatalogResult, CollectionId, ItemId, MediaDetails, SelectionState,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::bootstrap::AppServices;

#[derive(Parser, Debug)]
#[command(name = "anime-tracker")]
#[command(about = "Organize anime into collections", long_about = None)]
pub struct Cli {
    /// Config file (defaults to $ANIME_TRACKER_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List collections; the selected one is starred
    Collections,
    /// Show the items of a collection (the first one by default)
    Show { id: Option<CollectionId> },
    /// Create a collection
    Create { name: String },
    /// Rename a collection
    Rename { id: CollectionId, name: String },
    /// Delete a collection
    Delete { id: CollectionId },
    /// Search the catalog
    Search { query: String },
    /// Search the catalog and add picked results to a collection
    Add {
        id: CollectionId,
        query: String,
        /// 1-based positions in the search results
        #[arg(long, num_args = 1.., required = true)]
        pick: Vec<usize>,
    },
    /// Remove one item from a collection
    RemoveItem { id: CollectionId, item_id: ItemId },
    /// Show catalog details for a title
    Details {
        anilist_id: AnilistId,
        /// Also add the title to this collection
        #[arg(long, value_name = "COLLECTION_ID")]
        add_to: Option<CollectionId>,
    },
}

pub async fn execute(command: Command, services: &AppServices) -> anyhow::Result<()> {
    match command {
        Command::Collections => {
            let controller = loaded(services).await?;
            print!("{}", render_collections(controller.state()));
        }
        Command::Show { id } => {
            let mut controller = loaded(services).await?;
            if let Some(id) = id {
                controller.select(id)?;
            }
            let view = controller.view();
            let airing = match &view {
                ListView::Items { cards, .. } => {
                    next_airing(cards, services.catalog.as_ref(), Utc::now()).await
                }
                _ => Vec::new(),
            };
            print!("{}", render_view(&view, &airing));
        }
        Command::Create { name } => {
            let mut controller = services.controller();
            let id = controller.create_and_select(&name).await?;
            println!("{}", id);
        }
        Command::Rename { id, name } => {
            let mut controller = loaded(services).await?;
            controller.rename(id, &name).await?;
        }
        Command::Delete { id } => {
            let mut controller = loaded(services).await?;
            controller.delete(id).await?;
        }
        Command::Search { query } => {
            let mut quick = services.quick_search();
            quick.set_query(query);
            match quick.settle().await {
                Some(results) => print!("{}", render_results(results?)),
                None => bail!("search query is blank"),
            }
        }
        Command::Add { id, query, pick } => add_picked(services, id, &query, &pick).await?,
        Command::RemoveItem { id, item_id } => remove_item(services, id, item_id).await?,
        Command::Details { anilist_id, add_to } => {
            let details = services.catalog.details(anilist_id).await?;
            print!("{}", render_details(&details, Utc::now()));
            if let Some(collection_id) = add_to {
                let mut controller = loaded(services).await?;
                controller
                    .add_title(collection_id, details.to_new_item())
                    .await?;
            }
        }
    }
    Ok(())
}

async fn loaded(services: &AppServices) -> anyhow::Result<SelectionController> {
    let mut controller = services.controller();
    controller.load().await?;
    Ok(controller)
}

async fn add_picked(
    services: &AppServices,
    id: CollectionId,
    query: &str,
    picks: &[usize],
) -> anyhow::Result<()> {
    let mut controller = loaded(services).await?;
    controller.select(id)?;
    let mut session = controller
        .begin_edit(services.debouncer())
        .ok_or_else(|| anyhow!("collection {} is not selected", id))?;

    session.set_query(query);
    match session.settle_search().await {
        Some(found) => {
            found?;
        }
        None => bail!("search query is blank"),
    }

    let results = session.search_results().to_vec();
    let chosen: Vec<&CatalogResult> = picks
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| results.get(i))
                .ok_or_else(|| anyhow!("no search result #{}; {} found", n, results.len()))
        })
        .collect::<anyhow::Result<_>>()?;

    for result in chosen {
        match session.toggle_addition(result) {
            ToggleOutcome::AlreadyInCollection => {
                eprintln!("{} is already in this collection", result.display_title())
            }
            ToggleOutcome::Unstaged => eprintln!("{} picked twice; skipped", result.display_title()),
            _ => {}
        }
    }

    if !session.has_changes() {
        session.close();
        println!("Nothing to add.");
        return Ok(());
    }

    match session.save().await {
        Ok(report) => {
            controller.absorb(&report).await?;
            for item in &report.added {
                println!("{:>6}  {}", item.id, item.anime_title);
            }
            Ok(())
        }
        Err(err) => {
            if !err.committed.is_empty() {
                if let Err(reload) = controller.absorb(&err.committed).await {
                    warn!(error = %reload, "reload after partial save failed");
                }
            }
            Err(err.into())
        }
    }
}

async fn remove_item(services: &AppServices, id: CollectionId, item_id: ItemId) -> anyhow::Result<()> {
    let mut controller = loaded(services).await?;
    controller.select(id)?;
    let mut session = controller
        .begin_edit(services.debouncer())
        .ok_or_else(|| anyhow!("collection {} is not selected", id))?;

    if !session.remove_existing(item_id) {
        session.close();
        bail!("item {} is not in collection {}", item_id, id);
    }

    let report = session.save().await?;
    controller.absorb(&report).await?;
    Ok(())
}

pub fn render_collections(state: &SelectionState) -> String {
    if state.collections.is_empty() {
        return "No collections yet.\n".to_string();
    }

    let mut out = String::new();
    for collection in &state.collections {
        let marker = if state.is_selected(collection.id) { '*' } else { ' ' };
        let count = collection.items.len();
        let _ = writeln!(
            out,
            "{} {:>4}  {} ({} item{})",
            marker,
            collection.id,
            collection.display_name(),
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    out
}

/// `airing` holds each card's countdown by position; missing entries render
/// without one.
pub fn render_view(view: &ListView<'_>, airing: &[Option<AiringCountdown>]) -> String {
    match view {
        ListView::Loading => "Loading...\n".to_string(),
        ListView::NoSelection => "No collection selected.\n".to_string(),
        ListView::Items { collection, cards } => {
            let mut out = format!("{}\n", collection.display_name());
            if cards.is_empty() {
                out.push_str("  (no items)\n");
            }
            for (n, card) in cards.iter().enumerate() {
                let _ = write!(
                    out,
                    "{:>6}  {}  [anilist {}]",
                    card.item_id, card.title, card.anilist_id
                );
                if let Some(countdown) = airing.get(n).copied().flatten() {
                    let _ = write!(out, "  next episode in {}", countdown);
                }
                out.push('\n');
            }
            out
        }
    }
}

pub fn render_results(results: &[CatalogResult]) -> String {
    if results.is_empty() {
        return "No matches.\n".to_string();
    }

    let mut out = String::new();
    for (n, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  [anilist {}]",
            n + 1,
            result.display_title(),
            result.id
        );
    }
    out
}

pub fn render_details(details: &MediaDetails, now: DateTime<Utc>) -> String {
    let mut out = format!("{}\n", details.display_title());

    let mut facts = Vec::new();
    match (&details.season, details.season_year) {
        (Some(season), Some(year)) => facts.push(format!("{} {}", title_case(season), year)),
        (None, Some(year)) => facts.push(year.to_string()),
        _ => {}
    }
    if let Some(episodes) = details.episodes {
        facts.push(format!("{} episodes", episodes));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join(", "));
    }
    if !details.genres.is_empty() {
        let _ = writeln!(out, "Genres: {}", details.genres.join(", "));
    }

    let countdown = details
        .next_airing_episode
        .and_then(|next| next.airing_time())
        .and_then(|at| AiringCountdown::until(at, now));
    if let Some(countdown) = countdown {
        let _ = writeln!(out, "Next episode in {}", countdown);
    }

    if let Some(description) = details.description.as_deref() {
        let text = strip_markup(description);
        if !text.is_empty() {
            let _ = write!(out, "\n{}\n", text);
        }
    }
    out
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Catalog descriptions carry light HTML; `<br>` becomes a newline and any
/// other tag is dropped.
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => {
                let tag = rest[start + 1..start + end].trim().to_lowercase();
                if tag.starts_with("br") {
                    out.push('\n');
                }
                rest = &rest[start + end + 1..];
            }
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    out.push_str(rest);

    let mut collapsed = out.replace("\n\n\n", "\n\n");
    while collapsed.contains("\n\n\n") {
        collapsed = collapsed.replace("\n\n\n", "\n\n");
    }
    collapsed.trim().to_string()
}
