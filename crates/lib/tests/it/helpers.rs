use std::sync::Arc;

use tokio::sync::broadcast;
use vitrine::{
    ExhibitStore, FixedClock, ID,
    backend::database::InMemory,
    document::RootDoc,
    store::{Invalidation, StoreConfig},
    view::{BlockContent, BlockView, CollectionView, NewBlock, NewCollection, NewPanel, NewSection, PanelView, SectionView},
};

// ==========================
// CORE TEST FACTORIES
// ==========================

/// An empty InMemory store on a fixed clock.
pub fn test_backend() -> Arc<InMemory> {
    Arc::new(InMemory::with_clock(Arc::new(FixedClock::new(1_000))))
}

/// A facade over a fresh backend, returning both so tests can inspect or
/// sabotage the backend directly.
pub fn test_store() -> (ExhibitStore, Arc<InMemory>) {
    test_store_with(StoreConfig::default())
}

pub fn test_store_with(config: StoreConfig) -> (ExhibitStore, Arc<InMemory>) {
    let backend = test_backend();
    let store = ExhibitStore::with_config(backend.clone(), config);
    (store, backend)
}

pub async fn create_collection(store: &ExhibitStore, name: &str) -> CollectionView {
    store
        .create_collection(NewCollection::new(name))
        .await
        .expect("Failed to create collection")
}

pub async fn create_section(store: &ExhibitStore, collection_id: &ID, title: &str) -> SectionView {
    store
        .sections()
        .create(collection_id, NewSection::new(title))
        .await
        .expect("Failed to create section")
}

pub async fn create_panel(store: &ExhibitStore, section_id: &ID, title: &str) -> PanelView {
    store
        .panels()
        .create(section_id, NewPanel::new(title))
        .await
        .expect("Failed to create panel")
}

pub async fn create_text_block(store: &ExhibitStore, panel_id: &ID, body: &str) -> BlockView {
    store
        .blocks()
        .create(panel_id, NewBlock::new(BlockContent::text(body)))
        .await
        .expect("Failed to create block")
}

/// One Collection holding one Section, one Panel and two Blocks.
pub struct Exhibit {
    pub collection: CollectionView,
    pub section: SectionView,
    pub panel: PanelView,
    pub blocks: Vec<BlockView>,
}

pub async fn create_exhibit(store: &ExhibitStore, name: &str) -> Exhibit {
    let collection = create_collection(store, name).await;
    let section = create_section(store, &collection.id, "Arrival").await;
    let panel = create_panel(store, &section.id, "Welcome").await;
    let blocks = vec![
        create_text_block(store, &panel.id, "First words").await,
        create_text_block(store, &panel.id, "Second words").await,
    ];
    Exhibit {
        collection,
        section,
        panel,
        blocks,
    }
}

/// Raw stored document at full depth.
pub async fn stored(backend: &InMemory, root_id: &ID) -> RootDoc {
    use vitrine::{backend::DocumentStore, document::Depth};
    backend
        .get(root_id, Depth::FULL)
        .await
        .expect("Failed to read root document")
}

/// Every event already queued on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<Invalidation>) -> Vec<Invalidation> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
