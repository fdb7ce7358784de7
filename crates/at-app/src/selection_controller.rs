//! Owner of the collection list and the current selection.
//!
//! Every mutation is a round trip through [`CollectionStorePort`]; local state
//! changes only after the server confirms. Subscribers get a fresh
//! [`SelectionSnapshot`] after each change.

use std::sync::Arc;

use at_core::ports::{CollectionStorePort, Notice, NoticePort};
use at_core::{
    Collection, CollectionError, CollectionId, CollectionItem, NewCollectionItem,
    SelectionSnapshot, SelectionState, ValidationError,
};
use tokio::sync::watch;
use tracing::{info, info_span, warn, Instrument};

use crate::edit_session::{PendingEditSession, SaveReport};
use crate::list_reconciler::{reconcile_list, ListView};
use crate::SearchDebouncer;

pub struct SelectionController {
    store: Arc<dyn CollectionStorePort>,
    notices: Arc<dyn NoticePort>,
    state: SelectionState,
    loading: bool,
    updates: watch::Sender<SelectionSnapshot>,
}

impl SelectionController {
    pub fn new(store: Arc<dyn CollectionStorePort>, notices: Arc<dyn NoticePort>) -> Self {
        let (updates, _) = watch::channel(SelectionSnapshot::default());
        Self {
            store,
            notices,
            state: SelectionState::default(),
            loading: false,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionSnapshot> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn collections(&self) -> &[Collection] {
        &self.state.collections
    }

    pub fn selected(&self) -> Option<&Collection> {
        self.state.selected()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// What the main list should show right now.
    pub fn view(&self) -> ListView<'_> {
        reconcile_list(self.selected(), self.loading)
    }

    /// Opens an edit session over the selected collection.
    pub fn begin_edit(&self, search: SearchDebouncer) -> Option<PendingEditSession> {
        let collection = self.selected()?;
        Some(PendingEditSession::open(
            collection,
            Arc::clone(&self.store),
            search,
        ))
    }

    /// Replaces the collection list with the server's.
    ///
    /// With nothing selected yet, the first collection becomes selected. A
    /// selection that vanished server-side is cleared.
    pub async fn load(&mut self) -> Result<(), CollectionError> {
        let span = info_span!("usecase.selection.load");
        async {
            self.loading = true;
            self.publish();

            let result = self.store.list().await;
            self.loading = false;

            let collections = match result {
                Ok(collections) => collections,
                Err(e) => {
                    self.publish();
                    return Err(self.fail("Failed to load collections", e.into()));
                }
            };

            let had_selection = self.state.selected_id.is_some();
            self.state.collections = collections;
            if self.state.repair() {
                warn!("selected collection no longer exists; selection cleared");
            } else if !had_selection {
                self.state.selected_id = self.state.collections.first().map(|c| c.id);
            }

            info!(
                count = self.state.collections.len(),
                selected = ?self.state.selected_id,
                "collections loaded"
            );
            self.publish();
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub fn select(&mut self, id: CollectionId) -> Result<(), ValidationError> {
        if !self.state.contains(id) {
            return Err(ValidationError::UnknownCollection(id));
        }
        self.state.selected_id = Some(id);
        self.publish();
        Ok(())
    }

    pub async fn create_and_select(&mut self, name: &str) -> Result<CollectionId, CollectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(ValidationError::EmptyName));
        }

        let span = info_span!("usecase.selection.create", name = %name);
        async {
            let created = self
                .store
                .create(name)
                .await
                .map_err(|e| self.fail("Failed to create collection", e.into()))?;

            let id = created.id;
            info!(collection_id = %id, "collection created");
            self.notices
                .notify(Notice::success(format!("Created {}", created.display_name())));
            self.state.collections.push(created);
            self.state.selected_id = Some(id);
            self.publish();
            Ok(id)
        }
        .instrument(span)
        .await
    }

    /// Renames a collection. Only the name changes locally; items are kept
    /// as they are.
    pub async fn rename(&mut self, id: CollectionId, name: &str) -> Result<(), CollectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(ValidationError::EmptyName));
        }
        if !self.state.contains(id) {
            return Err(self.reject(ValidationError::UnknownCollection(id)));
        }

        let span = info_span!("usecase.selection.rename", collection_id = %id);
        async {
            let updated = self
                .store
                .rename(id, name)
                .await
                .map_err(|e| self.fail("Failed to rename collection", e.into()))?;

            if let Some(collection) = self.state.find_mut(id) {
                collection.name = updated.name;
            }
            info!("collection renamed");
            self.publish();
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Deletes a collection. Deleting the selected one leaves nothing
    /// selected.
    pub async fn delete(&mut self, id: CollectionId) -> Result<(), CollectionError> {
        if !self.state.contains(id) {
            return Err(self.reject(ValidationError::UnknownCollection(id)));
        }

        let span = info_span!("usecase.selection.delete", collection_id = %id);
        async {
            self.store
                .remove(id)
                .await
                .map_err(|e| self.fail("Failed to delete collection", e.into()))?;

            self.state.collections.retain(|c| c.id != id);
            if self.state.is_selected(id) {
                self.state.selected_id = None;
            }
            info!("collection deleted");
            self.notices.notify(Notice::success("Collection deleted"));
            self.publish();
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Adds one catalog title to a specific collection, outside any edit
    /// session.
    pub async fn add_title(
        &mut self,
        collection_id: CollectionId,
        item: NewCollectionItem,
    ) -> Result<CollectionItem, CollectionError> {
        let Some(collection) = self.state.find(collection_id) else {
            return Err(self.reject(ValidationError::UnknownCollection(collection_id)));
        };
        if collection.contains_title(item.anilist_id) {
            let title = item.anime_title.clone();
            return Err(self.reject(ValidationError::AlreadyInCollection { title }));
        }

        let span = info_span!(
            "usecase.selection.add_title",
            collection_id = %collection_id,
            anilist_id = %item.anilist_id,
        );
        async {
            let created = self
                .store
                .add_item(collection_id, &item)
                .await
                .map_err(|e| self.fail("Failed to add to collection", e.into()))?;

            if let Some(collection) = self.state.find_mut(collection_id) {
                collection.items.push(created.clone());
                self.notices.notify(Notice::success(format!(
                    "Added {} to {}",
                    created.anime_title,
                    collection.display_name()
                )));
            }
            self.publish();
            Ok(created)
        }
        .instrument(span)
        .await
    }

    /// Folds the confirmed writes of an edit session into local state, then
    /// reloads for the authoritative item list.
    ///
    /// If the reload fails the merged state stays and the error is returned.
    pub async fn absorb(&mut self, report: &SaveReport) -> Result<(), CollectionError> {
        if let Some(collection) = self.state.find_mut(report.collection_id) {
            for added in &report.added {
                if !collection.items.iter().any(|i| i.id == added.id) {
                    collection.items.push(added.clone());
                }
            }
            collection.items.retain(|i| !report.removed.contains(&i.id));
        }
        self.publish();

        self.load().await
    }

    fn publish(&self) {
        self.updates.send_replace(SelectionSnapshot {
            state: self.state.clone(),
            loading: self.loading,
        });
    }

    fn reject(&self, error: ValidationError) -> CollectionError {
        warn!(error = %error, "request rejected before sending");
        self.notices.notify(Notice::error(capitalize(&error.to_string())));
        error.into()
    }

    fn fail(&self, action: &str, error: CollectionError) -> CollectionError {
        warn!(error = %error, "{}", action);
        self.notices
            .notify(Notice::error(format!("{}. Please try again.", action)));
        error
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_core::ports::{MockCollectionStore, MockNotices, NoticeLevel};
    use at_core::{AnilistId, FetchError, ItemId, Operation};
    use mockall::predicate::eq;

    fn collection(id: i64, name: &str) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: Some(name.to_string()),
            items: Vec::new(),
        }
    }

    fn quiet_notices() -> Arc<MockNotices> {
        let mut notices = MockNotices::new();
        notices.expect_notify().return_const(());
        Arc::new(notices)
    }

    async fn loaded(mut store: MockCollectionStore, list: Vec<Collection>) -> SelectionController {
        store.expect_list().times(1).return_once(move || Ok(list));
        let mut controller = SelectionController::new(Arc::new(store), quiet_notices());
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn load_selects_first_collection_when_nothing_selected() {
        let controller = loaded(
            MockCollectionStore::new(),
            vec![collection(1, "Seasonal"), collection(2, "Classics")],
        )
        .await;

        assert_eq!(controller.state().selected_id, Some(CollectionId::new(1)));
        assert_eq!(controller.collections().len(), 2);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn load_failure_keeps_previous_state() {
        let mut store = MockCollectionStore::new();
        let mut calls = 0;
        store.expect_list().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![collection(1, "Seasonal")])
            } else {
                Err(FetchError::transport(Operation::ListCollections, "offline"))
            }
        });
        let mut controller = SelectionController::new(Arc::new(store), quiet_notices());
        controller.load().await.unwrap();
        let before = controller.state().clone();

        let err = controller.load().await.unwrap_err();

        assert!(matches!(err, CollectionError::Network(_)));
        assert_eq!(controller.state(), &before);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn load_clears_selection_that_disappeared() {
        let mut store = MockCollectionStore::new();
        let mut calls = 0;
        store.expect_list().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![collection(1, "Seasonal"), collection(2, "Classics")])
            } else {
                Ok(vec![collection(1, "Seasonal")])
            }
        });
        let mut controller = SelectionController::new(Arc::new(store), quiet_notices());
        controller.load().await.unwrap();
        controller.select(CollectionId::new(2)).unwrap();

        controller.load().await.unwrap();

        assert_eq!(controller.state().selected_id, None);
    }

    #[tokio::test]
    async fn select_rejects_unknown_collection() {
        let mut controller = loaded(MockCollectionStore::new(), vec![collection(1, "Seasonal")]).await;

        let err = controller.select(CollectionId::new(9)).unwrap_err();

        assert_eq!(err, ValidationError::UnknownCollection(CollectionId::new(9)));
        assert_eq!(controller.state().selected_id, Some(CollectionId::new(1)));
    }

    #[tokio::test]
    async fn create_appends_and_selects() {
        let mut store = MockCollectionStore::new();
        store
            .expect_create()
            .withf(|name| name == "Classics")
            .times(1)
            .returning(|_| Ok(collection(2, "Classics")));
        let mut controller = loaded(store, vec![collection(1, "Seasonal")]).await;

        let id = controller.create_and_select("  Classics ").await.unwrap();

        assert_eq!(id, CollectionId::new(2));
        assert_eq!(controller.collections().last().unwrap().id, id);
        assert_eq!(controller.state().selected_id, Some(id));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_a_request() {
        let mut store = MockCollectionStore::new();
        store.expect_create().never();
        store.expect_rename().never();
        let mut notices = MockNotices::new();
        notices
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error)
            .times(2)
            .return_const(());
        store
            .expect_list()
            .times(1)
            .return_once(|| Ok(vec![collection(1, "Seasonal")]));
        let mut controller = SelectionController::new(Arc::new(store), Arc::new(notices));
        controller.load().await.unwrap();
        let before = controller.state().clone();

        let create = controller.create_and_select("   ").await.unwrap_err();
        let rename = controller.rename(CollectionId::new(1), "").await.unwrap_err();

        assert_eq!(create, CollectionError::Validation(ValidationError::EmptyName));
        assert_eq!(rename, CollectionError::Validation(ValidationError::EmptyName));
        assert_eq!(controller.state(), &before);
    }

    #[tokio::test]
    async fn rename_changes_only_the_name() {
        let mut store = MockCollectionStore::new();
        store
            .expect_rename()
            .withf(|id, name| *id == CollectionId::new(1) && name == "Winter 2025")
            .times(1)
            .returning(|id, name| {
                Ok(Collection {
                    id,
                    name: Some(name.to_string()),
                    items: Vec::new(),
                })
            });
        let mut seasonal = collection(1, "Seasonal");
        seasonal.items.push(CollectionItem {
            id: ItemId::new(10),
            anilist_id: AnilistId::new(7),
            anime_title: "Mushishi".to_string(),
            cover_image: None,
        });
        let mut controller = loaded(store, vec![seasonal]).await;

        controller
            .rename(CollectionId::new(1), "Winter 2025")
            .await
            .unwrap();

        let selected = controller.selected().unwrap();
        assert_eq!(selected.display_name(), "Winter 2025");
        assert_eq!(selected.items.len(), 1);
    }

    #[tokio::test]
    async fn deleting_selected_collection_clears_selection() {
        let mut store = MockCollectionStore::new();
        store
            .expect_remove()
            .with(eq(CollectionId::new(1)))
            .times(1)
            .returning(|_| Ok(Default::default()));
        let mut controller =
            loaded(store, vec![collection(1, "Seasonal"), collection(2, "Classics")]).await;

        controller.delete(CollectionId::new(1)).await.unwrap();

        assert_eq!(controller.state().selected_id, None);
        assert_eq!(controller.collections().len(), 1);
        assert!(matches!(controller.view(), ListView::NoSelection));
    }

    #[tokio::test]
    async fn deleting_other_collection_keeps_selection() {
        let mut store = MockCollectionStore::new();
        store
            .expect_remove()
            .with(eq(CollectionId::new(2)))
            .times(1)
            .returning(|_| Ok(Default::default()));
        let mut controller =
            loaded(store, vec![collection(1, "Seasonal"), collection(2, "Classics")]).await;

        controller.delete(CollectionId::new(2)).await.unwrap();

        assert_eq!(controller.state().selected_id, Some(CollectionId::new(1)));
    }

    #[tokio::test]
    async fn failed_delete_leaves_state_untouched() {
        let mut store = MockCollectionStore::new();
        store
            .expect_remove()
            .times(1)
            .returning(|_| Err(FetchError::status(Operation::DeleteCollection, 503, "down")));
        let mut controller = loaded(store, vec![collection(1, "Seasonal")]).await;

        let err = controller.delete(CollectionId::new(1)).await.unwrap_err();

        assert!(err.is_retriable());
        assert!(controller.state().contains(CollectionId::new(1)));
        assert_eq!(controller.state().selected_id, Some(CollectionId::new(1)));
    }

    #[tokio::test]
    async fn add_title_rejects_duplicates_before_sending() {
        let mut store = MockCollectionStore::new();
        store.expect_add_item().never();
        let mut seasonal = collection(1, "Seasonal");
        seasonal.items.push(CollectionItem {
            id: ItemId::new(10),
            anilist_id: AnilistId::new(7),
            anime_title: "Mushishi".to_string(),
            cover_image: None,
        });
        let mut controller = loaded(store, vec![seasonal]).await;

        let err = controller
            .add_title(
                CollectionId::new(1),
                NewCollectionItem {
                    anilist_id: AnilistId::new(7),
                    anime_title: "Mushishi".to_string(),
                    cover_image: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CollectionError::Validation(ValidationError::AlreadyInCollection { .. })
        ));
    }

    #[tokio::test]
    async fn subscribers_see_each_change() {
        let mut store = MockCollectionStore::new();
        store
            .expect_create()
            .returning(|_| Ok(collection(2, "Classics")));
        let mut controller = loaded(store, vec![collection(1, "Seasonal")]).await;
        let mut updates = controller.subscribe();
        let _ = updates.borrow_and_update();

        controller.create_and_select("Classics").await.unwrap();

        assert!(updates.has_changed().unwrap());
        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot.state.selected_id, Some(CollectionId::new(2)));
        assert!(!snapshot.loading);
    }
}
