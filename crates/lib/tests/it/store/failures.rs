use vitrine::{
    document::Level,
    store::{Cause, StoreConfig, StoreError},
    view::{CollectionPatch, NewSection, SectionPatch},
};

use crate::helpers::*;

#[tokio::test]
async fn test_failed_write_leaves_collection_unchanged() {
    let (store, backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;
    let before = stored(&backend, &exhibit.collection.id).await;
    let mut rx = store.subscribe();

    backend.fail_next_puts(1);
    let err = store
        .sections()
        .create(&exhibit.collection.id, NewSection::new("Departure"))
        .await
        .unwrap_err();
    assert!(err.is_persist_failure());
    match &err {
        vitrine::Error::Store(StoreError::PersistFailed { root_id, .. }) => {
            assert_eq!(root_id, &exhibit.collection.id);
        }
        other => panic!("expected PersistFailed, got {other:?}"),
    }

    assert_eq!(stored(&backend, &exhibit.collection.id).await, before);
    let sections = store.sections().list(&exhibit.collection.id).await.unwrap();
    assert_eq!(sections, vec![exhibit.section.clone()]);

    // Listeners are told their view of the list may be out of date
    let events = drain(&mut rx);
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.cause == Cause::PersistFailed));
    assert_eq!(events[0].listing.level, Level::Section);

    // Nothing is retried automatically; a fresh call succeeds
    let section = store
        .sections()
        .create(&exhibit.collection.id, NewSection::new("Departure"))
        .await
        .unwrap();
    assert_eq!(section.order, 2);
}

#[tokio::test]
async fn test_failed_update_and_delete_keep_nodes() {
    let (store, backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;

    backend.fail_next_puts(2);
    let patch = SectionPatch {
        title: Some("Renamed".into()),
        ..Default::default()
    };
    let err = store
        .sections()
        .update(&exhibit.section.id, patch)
        .await
        .unwrap_err();
    assert!(err.is_persist_failure());
    let err = store.blocks().delete(&exhibit.blocks[0].id).await.unwrap_err();
    assert!(err.is_persist_failure());

    assert_eq!(
        store.sections().get(&exhibit.section.id).await.unwrap().title,
        "Arrival"
    );
    assert_eq!(store.blocks().list(&exhibit.panel.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_collection_update() {
    let (store, backend) = test_store();
    let collection = create_collection(&store, "Memory").await;

    backend.fail_next_puts(1);
    let patch = CollectionPatch {
        name: Some("Renamed".into()),
        ..Default::default()
    };
    let err = store
        .update_collection(&collection.id, patch)
        .await
        .unwrap_err();
    assert!(err.is_persist_failure());
    assert_eq!(store.get_collection(&collection.id).await.unwrap().name, "Memory");
}

#[tokio::test]
async fn test_failed_create_is_not_indexed() {
    let (store, backend) = test_store_with(StoreConfig::default().with_node_index(true));
    let collection = create_collection(&store, "Memory").await;

    backend.fail_next_puts(1);
    assert!(
        store
            .sections()
            .create(&collection.id, NewSection::new("Arrival"))
            .await
            .is_err()
    );
    assert!(store.node_index().unwrap().is_empty().await);
}

#[tokio::test]
async fn test_unavailable_store_surfaces_backend_error() {
    let (store, backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;
    backend.set_available(false);

    let err = store.blocks().list(&exhibit.panel.id).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(!err.is_not_found());

    let err = store
        .sections()
        .create(&exhibit.collection.id, NewSection::new("Departure"))
        .await
        .unwrap_err();
    assert!(err.is_unavailable());

    backend.set_available(true);
    assert_eq!(store.blocks().list(&exhibit.panel.id).await.unwrap().len(), 2);
}
