use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use at_app::{
    ListView, QuickSearch, SearchDebouncer, SelectionController, SessionPhase, ToggleOutcome,
};
use at_core::ports::{CatalogPort, CollectionStorePort, Notice, NoticeLevel, NoticePort};
use at_core::{
    AnilistId, CatalogResult, CatalogTitle, Collection, CollectionId, CollectionItem,
    DeleteConfirmation, FetchError, ItemId, MediaDetails, NewCollectionItem, Operation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoreCall {
    List,
    Create(String),
    Rename(CollectionId, String),
    Remove(CollectionId),
    AddItem(CollectionId, AnilistId),
    RemoveItem(CollectionId, ItemId),
}

/// Server stand-in that keeps collections in memory and logs every request.
#[derive(Default)]
struct InMemoryStore {
    collections: Mutex<Vec<Collection>>,
    calls: Mutex<Vec<StoreCall>>,
    next_id: Mutex<i64>,
    fail_removes: bool,
}

impl InMemoryStore {
    fn seeded(collections: Vec<Collection>) -> Self {
        Self {
            collections: Mutex::new(collections),
            next_id: Mutex::new(1000),
            ..Default::default()
        }
    }

    fn failing_removes(mut self) -> Self {
        self.fail_removes = true;
        self
    }

    fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != StoreCall::List)
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn not_found(op: Operation) -> FetchError {
        FetchError::status(op, 404, "Not Found")
    }
}

#[async_trait]
impl CollectionStorePort for InMemoryStore {
    async fn list(&self) -> Result<Vec<Collection>, FetchError> {
        self.record(StoreCall::List);
        Ok(self.collections.lock().unwrap().clone())
    }

    async fn create(&self, name: &str) -> Result<Collection, FetchError> {
        self.record(StoreCall::Create(name.to_string()));
        let created = Collection {
            id: CollectionId::new(self.next_id()),
            name: Some(name.to_string()),
            items: Vec::new(),
        };
        self.collections.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn rename(&self, id: CollectionId, name: &str) -> Result<Collection, FetchError> {
        self.record(StoreCall::Rename(id, name.to_string()));
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found(Operation::RenameCollection))?;
        collection.name = Some(name.to_string());
        Ok(collection.clone())
    }

    async fn remove(&self, id: CollectionId) -> Result<DeleteConfirmation, FetchError> {
        self.record(StoreCall::Remove(id));
        if self.fail_removes {
            return Err(FetchError::status(
                Operation::DeleteCollection,
                500,
                "Internal Server Error",
            ));
        }
        self.collections.lock().unwrap().retain(|c| c.id != id);
        Ok(DeleteConfirmation {
            message: "Collection deleted".to_string(),
        })
    }

    async fn add_item(
        &self,
        id: CollectionId,
        item: &NewCollectionItem,
    ) -> Result<CollectionItem, FetchError> {
        self.record(StoreCall::AddItem(id, item.anilist_id));
        let created = CollectionItem {
            id: ItemId::new(self.next_id()),
            anilist_id: item.anilist_id,
            anime_title: item.anime_title.clone(),
            cover_image: item.cover_image.clone(),
        };
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found(Operation::AddItem))?;
        collection.items.push(created.clone());
        Ok(created)
    }

    async fn remove_item(
        &self,
        id: CollectionId,
        item_id: ItemId,
    ) -> Result<DeleteConfirmation, FetchError> {
        self.record(StoreCall::RemoveItem(id, item_id));
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found(Operation::RemoveItem))?;
        collection.items.retain(|i| i.id != item_id);
        Ok(DeleteConfirmation::default())
    }
}

struct FixedCatalog {
    results: Vec<CatalogResult>,
}

#[async_trait]
impl CatalogPort for FixedCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogResult>, FetchError> {
        let needle = query.to_lowercase();
        Ok(self
            .results
            .iter()
            .filter(|r| r.display_title().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn details(&self, id: AnilistId) -> Result<MediaDetails, FetchError> {
        Err(FetchError::status(
            Operation::CatalogDetails,
            404,
            format!("no media {}", id),
        ))
    }
}

#[derive(Default)]
struct RecordedNotices {
    seen: Mutex<Vec<Notice>>,
}

impl RecordedNotices {
    fn errors(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl NoticePort for RecordedNotices {
    fn notify(&self, notice: Notice) {
        self.seen.lock().unwrap().push(notice);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn catalog() -> Arc<FixedCatalog> {
    let title = |id: i64, romaji: &str| CatalogResult {
        id: AnilistId::new(id),
        title: CatalogTitle {
            romaji: romaji.to_string(),
            english: None,
        },
        cover_image: None,
    };
    Arc::new(FixedCatalog {
        results: vec![title(99, "Akira"), title(98, "Akira Kurosawa's Dreams")],
    })
}

fn seasonal() -> Collection {
    Collection {
        id: CollectionId::new(1),
        name: Some("Seasonal".to_string()),
        items: Vec::new(),
    }
}

fn classics() -> Collection {
    Collection {
        id: CollectionId::new(2),
        name: Some("Classics".to_string()),
        items: Vec::new(),
    }
}

#[tokio::test]
async fn staged_addition_is_saved_once_and_shows_after_reload() {
    init_tracing();
    tokio::time::pause();
    let store = Arc::new(InMemoryStore::seeded(vec![seasonal(), classics()]));
    let notices = Arc::new(RecordedNotices::default());
    let mut controller = SelectionController::new(store.clone(), notices.clone());
    controller.load().await.unwrap();
    controller.select(CollectionId::new(1)).unwrap();

    let search = SearchDebouncer::new(catalog(), Duration::from_millis(500));
    let mut session = controller.begin_edit(search).expect("a collection is selected");
    session.set_query("akira");
    assert_eq!(session.settle_search().await.unwrap().unwrap(), 2);
    let akira = session.search_results()[0].clone();
    assert_eq!(session.toggle_addition(&akira), ToggleOutcome::Staged);

    let report = session.save().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Closed);
    assert_eq!(
        store.writes(),
        vec![StoreCall::AddItem(CollectionId::new(1), AnilistId::new(99))]
    );

    controller.absorb(&report).await.unwrap();

    let ListView::Items { cards, .. } = controller.view() else {
        panic!("expected the selected collection's items");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].anilist_id, AnilistId::new(99));
    assert_eq!(cards[0].title, "Akira");
    assert!(notices.errors().is_empty());
}

#[tokio::test]
async fn failed_delete_keeps_collection_and_selection() {
    init_tracing();
    let store = Arc::new(InMemoryStore::seeded(vec![seasonal()]).failing_removes());
    let notices = Arc::new(RecordedNotices::default());
    let mut controller = SelectionController::new(store.clone(), notices.clone());
    controller.load().await.unwrap();
    let before = controller.state().clone();

    let err = controller.delete(CollectionId::new(1)).await.unwrap_err();

    assert!(err.is_retriable());
    assert_eq!(controller.state(), &before);
    assert_eq!(
        notices.errors(),
        vec!["Failed to delete collection. Please try again.".to_string()]
    );
}

#[tokio::test]
async fn removal_and_addition_in_one_session() {
    tokio::time::pause();
    let mut with_item = seasonal();
    with_item.items.push(CollectionItem {
        id: ItemId::new(10),
        anilist_id: AnilistId::new(7),
        anime_title: "Mushishi".to_string(),
        cover_image: None,
    });
    let store = Arc::new(InMemoryStore::seeded(vec![with_item]));
    let mut controller =
        SelectionController::new(store.clone(), Arc::new(RecordedNotices::default()));
    controller.load().await.unwrap();

    let mut session = controller
        .begin_edit(SearchDebouncer::with_default_period(catalog()))
        .unwrap();
    assert!(session.remove_existing(ItemId::new(10)));
    session.set_query("dreams");
    session.settle_search().await.unwrap().unwrap();
    let dreams = session.search_results()[0].clone();
    session.toggle_addition(&dreams);

    let report = session.save().await.unwrap();
    controller.absorb(&report).await.unwrap();

    assert_eq!(
        store.writes(),
        vec![
            StoreCall::AddItem(CollectionId::new(1), AnilistId::new(98)),
            StoreCall::RemoveItem(CollectionId::new(1), ItemId::new(10)),
        ]
    );
    let titles: Vec<&str> = controller
        .selected()
        .unwrap()
        .items
        .iter()
        .map(|i| i.anime_title.as_str())
        .collect();
    assert_eq!(titles, vec!["Akira Kurosawa's Dreams"]);
}

#[tokio::test]
async fn quick_search_pick_goes_straight_into_a_collection() {
    tokio::time::pause();
    let store = Arc::new(InMemoryStore::seeded(vec![seasonal(), classics()]));
    let mut controller =
        SelectionController::new(store.clone(), Arc::new(RecordedNotices::default()));
    controller.load().await.unwrap();
    let mut quick = QuickSearch::new(SearchDebouncer::with_default_period(catalog()));

    quick.set_query("akira");
    let pick = quick.settle().await.unwrap().unwrap()[0].clone();
    assert_eq!(quick.choose(&pick), AnilistId::new(99));

    let created = controller
        .add_title(CollectionId::new(2), pick.to_new_item())
        .await
        .unwrap();

    assert_eq!(created.anilist_id, AnilistId::new(99));
    assert!(controller.state().find(CollectionId::new(2)).unwrap().contains_title(AnilistId::new(99)));
    // Adding to a non-selected collection leaves the selection alone.
    assert_eq!(controller.state().selected_id, Some(CollectionId::new(1)));
}

#[tokio::test]
async fn rename_and_create_round_trip_through_the_store() {
    let store = Arc::new(InMemoryStore::seeded(vec![seasonal()]));
    let mut controller =
        SelectionController::new(store.clone(), Arc::new(RecordedNotices::default()));
    controller.load().await.unwrap();

    let id = controller.create_and_select("Backlog").await.unwrap();
    controller.rename(id, "Backlog 2025").await.unwrap();
    controller.load().await.unwrap();

    assert_eq!(controller.selected().unwrap().display_name(), "Backlog 2025");
    assert_eq!(
        store.calls(),
        vec![
            StoreCall::List,
            StoreCall::Create("Backlog".to_string()),
            StoreCall::Rename(id, "Backlog 2025".to_string()),
            StoreCall::List,
        ]
    );
}
