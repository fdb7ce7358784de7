//! Staging area behind the "add anime" dialog.
//!
//! A session snapshots the selected collection when the dialog opens, lets the
//! user search the catalog and stage additions and removals, and commits them
//! in one sequential pass on save.

use std::mem;
use std::sync::Arc;

use at_core::ports::CollectionStorePort;
use at_core::{
    AnilistId, CatalogResult, Collection, CollectionId, CollectionItem, FetchError, ItemId,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::debounce::{QueryUpdate, SearchDebouncer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Open, no search in flight.
    Idle,
    /// Open, a debounced search is pending.
    Searching,
    /// Writing staged changes to the store.
    Saving,
    /// Saved; the session holds nothing and accepts no further edits.
    Closed,
}

/// What [`PendingEditSession::toggle_addition`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Staged,
    Unstaged,
    /// The title is already in the collection; nothing changed.
    AlreadyInCollection,
    /// The title was staged for removal in this session; the removal was
    /// dropped instead.
    RemovalUndone,
    /// The session is closed.
    Ignored,
}

/// Writes confirmed by the store during a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub collection_id: CollectionId,
    pub added: Vec<CollectionItem>,
    pub removed: Vec<ItemId>,
}

impl SaveReport {
    fn new(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A save that stopped part way. Everything in `committed` reached the
/// server; the rest is still staged in the session.
#[derive(Debug, thiserror::Error)]
#[error("save stopped with {remaining_additions} addition(s) and {remaining_removals} removal(s) left: {source}")]
pub struct SaveError {
    pub committed: SaveReport,
    pub remaining_additions: usize,
    pub remaining_removals: usize,
    #[source]
    pub source: FetchError,
}

pub struct PendingEditSession {
    collection_id: CollectionId,
    existing_items: Vec<CollectionItem>,
    /// Item order at open, used to put undone removals back in place.
    original_order: Vec<ItemId>,
    pending_additions: Vec<CatalogResult>,
    pending_removals: Vec<CollectionItem>,
    search_query: String,
    search_results: Vec<CatalogResult>,
    phase: SessionPhase,
    committed: SaveReport,
    search: SearchDebouncer,
    store: Arc<dyn CollectionStorePort>,
}

impl PendingEditSession {
    /// Opens a session over a copy of `collection`'s items. Later changes to
    /// the collection do not reach an open session.
    pub fn open(
        collection: &Collection,
        store: Arc<dyn CollectionStorePort>,
        search: SearchDebouncer,
    ) -> Self {
        info!(
            collection_id = %collection.id,
            items = collection.items.len(),
            "edit session opened"
        );
        Self {
            collection_id: collection.id,
            existing_items: collection.items.clone(),
            original_order: collection.items.iter().map(|item| item.id).collect(),
            pending_additions: Vec::new(),
            pending_removals: Vec::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            phase: SessionPhase::Idle,
            committed: SaveReport::new(collection.id),
            search,
            store,
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != SessionPhase::Closed
    }

    pub fn is_searching(&self) -> bool {
        self.phase == SessionPhase::Searching
    }

    pub fn existing_items(&self) -> &[CollectionItem] {
        &self.existing_items
    }

    /// Staged additions, most recently staged first.
    pub fn pending_additions(&self) -> &[CatalogResult] {
        &self.pending_additions
    }

    pub fn pending_removals(&self) -> &[CollectionItem] {
        &self.pending_removals
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[CatalogResult] {
        &self.search_results
    }

    pub fn is_staged(&self, id: AnilistId) -> bool {
        self.pending_additions.iter().any(|r| r.id == id)
    }

    pub fn has_changes(&self) -> bool {
        !self.pending_additions.is_empty() || !self.pending_removals.is_empty()
    }

    /// Records a new query. Blank queries clear the results immediately;
    /// anything else is searched once typing pauses.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.is_open() {
            return;
        }

        self.search_query = query.into();
        match self.search.update(&self.search_query) {
            QueryUpdate::Cleared => {
                self.search_results.clear();
                self.phase = SessionPhase::Idle;
            }
            QueryUpdate::Scheduled => self.phase = SessionPhase::Searching,
        }
    }

    /// Waits for the pending search and stores its results.
    ///
    /// Returns `None` when no search is pending. A failed search keeps the
    /// previous results.
    pub async fn settle_search(&mut self) -> Option<Result<usize, FetchError>> {
        let settled = self.search.settled().await?;
        self.phase = SessionPhase::Idle;

        match settled.result {
            Ok(results) => {
                debug!(query = %settled.query, hits = results.len(), "search results stored");
                self.search_results = results;
                Some(Ok(self.search_results.len()))
            }
            Err(e) => {
                warn!(query = %settled.query, error = %e, "catalog search failed");
                Some(Err(e))
            }
        }
    }

    /// Stages `result` for addition, or un-stages it if it already is.
    ///
    /// New entries go to the front. Titles already in the collection are left
    /// alone.
    pub fn toggle_addition(&mut self, result: &CatalogResult) -> ToggleOutcome {
        if !self.is_open() {
            return ToggleOutcome::Ignored;
        }

        if let Some(pos) = self.pending_additions.iter().position(|r| r.id == result.id) {
            self.pending_additions.remove(pos);
            return ToggleOutcome::Unstaged;
        }

        if let Some(pos) = self
            .pending_removals
            .iter()
            .position(|item| item.anilist_id == result.id)
        {
            let item = self.pending_removals.remove(pos);
            self.restore(item);
            return ToggleOutcome::RemovalUndone;
        }

        if self
            .existing_items
            .iter()
            .any(|item| item.anilist_id == result.id)
        {
            return ToggleOutcome::AlreadyInCollection;
        }

        self.pending_additions.insert(0, result.clone());
        ToggleOutcome::Staged
    }

    /// Stages removal of an item that is currently in the collection.
    /// Returns false if the item is not among the existing items.
    pub fn remove_existing(&mut self, item_id: ItemId) -> bool {
        if !self.is_open() {
            return false;
        }

        match self.existing_items.iter().position(|item| item.id == item_id) {
            Some(pos) => {
                let item = self.existing_items.remove(pos);
                self.pending_removals.push(item);
                true
            }
            None => false,
        }
    }

    /// Puts a staged removal back among the existing items.
    pub fn undo_removal(&mut self, item_id: ItemId) -> bool {
        match self.pending_removals.iter().position(|item| item.id == item_id) {
            Some(pos) => {
                let item = self.pending_removals.remove(pos);
                self.restore(item);
                true
            }
            None => false,
        }
    }

    /// Reinserts `item` ahead of the first existing item that followed it
    /// when the session opened.
    fn restore(&mut self, item: CollectionItem) {
        let rank = |id: ItemId| self.original_order.iter().position(|known| *known == id);
        let own = rank(item.id);
        let at = self
            .existing_items
            .iter()
            .position(|other| rank(other.id) > own)
            .unwrap_or(self.existing_items.len());
        self.existing_items.insert(at, item);
    }

    /// Commits staged changes one request at a time: additions in staging
    /// order, then removals.
    ///
    /// Each confirmed write leaves the pending lists immediately, so calling
    /// `save` again after an error resumes with what is left. On success the
    /// session closes and the report tells the caller what to merge before
    /// reloading the collection.
    pub async fn save(&mut self) -> Result<SaveReport, SaveError> {
        if !self.is_open() {
            return Ok(SaveReport::new(self.collection_id));
        }

        self.search.cancel();
        self.phase = SessionPhase::Saving;

        let span = info_span!(
            "usecase.edit_session.save",
            collection_id = %self.collection_id,
            additions = self.pending_additions.len(),
            removals = self.pending_removals.len(),
        );
        async {
            self.commit_additions().await?;
            self.commit_removals().await?;

            let report = mem::replace(&mut self.committed, SaveReport::new(self.collection_id));
            info!(
                added = report.added.len(),
                removed = report.removed.len(),
                "edit session saved"
            );
            self.reset();
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn commit_additions(&mut self) -> Result<(), SaveError> {
        while let Some(next) = self.pending_additions.first() {
            let body = next.to_new_item();
            match self.store.add_item(self.collection_id, &body).await {
                Ok(created) => {
                    debug!(item_id = %created.id, anilist_id = %created.anilist_id, "item added");
                    self.pending_additions.remove(0);
                    self.existing_items.push(created.clone());
                    self.committed.added.push(created);
                }
                Err(e) => return Err(self.interrupted(e)),
            }
        }
        Ok(())
    }

    async fn commit_removals(&mut self) -> Result<(), SaveError> {
        while let Some(next) = self.pending_removals.first() {
            let item_id = next.id;
            match self.store.remove_item(self.collection_id, item_id).await {
                Ok(_) => debug!(item_id = %item_id, "item removed"),
                Err(e) if e.is_not_found() => {
                    warn!(item_id = %item_id, "item was already gone from the collection");
                }
                Err(e) => return Err(self.interrupted(e)),
            }
            self.pending_removals.remove(0);
            self.committed.removed.push(item_id);
        }
        Ok(())
    }

    fn interrupted(&mut self, source: FetchError) -> SaveError {
        warn!(
            error = %source,
            remaining_additions = self.pending_additions.len(),
            remaining_removals = self.pending_removals.len(),
            "save interrupted; remaining changes kept"
        );
        self.phase = SessionPhase::Idle;
        SaveError {
            committed: self.committed.clone(),
            remaining_additions: self.pending_additions.len(),
            remaining_removals: self.pending_removals.len(),
            source,
        }
    }

    fn reset(&mut self) {
        self.search.cancel();
        self.existing_items.clear();
        self.original_order.clear();
        self.pending_additions.clear();
        self.pending_removals.clear();
        self.search_query.clear();
        self.search_results.clear();
        self.phase = SessionPhase::Closed;
    }

    /// Discards the session without touching the server.
    pub fn close(mut self) {
        if self.has_changes() {
            info!(
                collection_id = %self.collection_id,
                additions = self.pending_additions.len(),
                removals = self.pending_removals.len(),
                "edit session closed; staged changes discarded"
            );
        }
        self.reset();
    }
}
