use serde_json::json;
use vitrine::{
    ID,
    backend::{DocumentStore, RootPatch},
    document::{Level, RootField},
    store::{StoreConfig, StoreError},
    view::{
        BlockContent, Coordinates, NewBlock, NewPanel, NewSection, NewWaypoint, PanelPatch,
        QuoteContent, SectionPatch, WaypointPatch,
    },
};

use crate::helpers::*;

#[tokio::test]
async fn test_create_assigns_next_order() {
    let (store, _backend) = test_store();
    let collection = create_collection(&store, "Memory").await;

    let first = create_section(&store, &collection.id, "Arrival").await;
    let second = create_section(&store, &collection.id, "Names").await;
    assert_eq!(first.order, 1);
    assert_eq!(second.order, 2);
    assert_eq!(first.collection_id, collection.id);

    // Gaps left by deletion are not reused
    store.sections().delete(&first.id).await.unwrap();
    let third = create_section(&store, &collection.id, "Departure").await;
    assert_eq!(third.order, 3);

    // Each list counts independently
    let panel = create_panel(&store, &second.id, "Welcome").await;
    assert_eq!(panel.order, 1);
    assert_eq!(panel.section_id, second.id);
}

#[tokio::test]
async fn test_create_under_missing_parent() {
    let (store, _backend) = test_store();
    let err = store
        .sections()
        .create(&ID::from("missing"), NewSection::new("Arrival"))
        .await
        .unwrap_err();
    match err {
        vitrine::Error::Store(StoreError::NotFound { level, id }) => {
            assert_eq!(level, Level::Collection);
            assert_eq!(id, ID::from("missing"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    let err = store
        .blocks()
        .create(&ID::from("nope"), NewBlock::new(BlockContent::text("Hi")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vitrine::Error::Store(StoreError::NotFound {
            level: Level::Panel,
            ..
        })
    ));
}

#[tokio::test]
async fn test_invalid_input_writes_nothing() {
    let (store, backend) = test_store();
    let collection = create_collection(&store, "Memory").await;

    let err = store
        .sections()
        .create(&collection.id, NewSection::new("  "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vitrine::Error::Store(StoreError::ValidationFailed { .. })
    ));

    let mut waypoint = NewWaypoint::new("Gate");
    waypoint.coordinates = Some(Coordinates { lat: 91.0, lng: 0.0 });
    let err = store
        .waypoints()
        .create(&collection.id, waypoint)
        .await
        .unwrap_err();
    assert!(err.is_validation_error());

    assert_eq!(stored(&backend, &collection.id).await.revision, 0);
}

#[tokio::test]
async fn test_list_and_get_carry_parent_ids() {
    let (store, _backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;

    let blocks = store.blocks().list(&exhibit.panel.id).await.unwrap();
    assert_eq!(blocks, exhibit.blocks);

    let panel = store.panels().get(&exhibit.panel.id).await.unwrap();
    assert_eq!(panel, exhibit.panel);

    let sections = store.sections().list(&exhibit.collection.id).await.unwrap();
    assert_eq!(sections, vec![exhibit.section.clone()]);

    let empty = store.waypoints().list(&exhibit.collection.id).await.unwrap();
    assert!(empty.is_empty());

    let err = store.panels().list(&ID::from("missing")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let (store, _backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;

    let mut patch = PanelPatch {
        full_width: Some(true),
        theme: Some(Some("night".into())),
        ..Default::default()
    };
    patch.attributes.insert("audioGuide".into(), json!(12));
    let panel = store.panels().update(&exhibit.panel.id, patch).await.unwrap();
    assert_eq!(panel.title, "Welcome");
    assert!(panel.display.full_width);
    assert!(panel.display.show_title);
    assert_eq!(panel.display.theme.as_deref(), Some("night"));
    assert_eq!(panel.attributes.get("audioGuide"), Some(&json!(12)));
    assert_eq!(panel.order, exhibit.panel.order);

    let patch = PanelPatch {
        theme: Some(None),
        ..Default::default()
    };
    let panel = store.panels().update(&exhibit.panel.id, patch).await.unwrap();
    assert_eq!(panel.display.theme, None);
    assert_eq!(panel.attributes.get("audioGuide"), Some(&json!(12)));

    // Blocks under the panel survive an edit of the panel itself
    assert_eq!(store.blocks().list(&exhibit.panel.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_changes_block_kind() {
    let (store, _backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;

    let quote = BlockContent::Quote(QuoteContent {
        text: "Never again".into(),
        attribution: Some("Visitor".into()),
    });
    let patch = vitrine::view::BlockPatch {
        content: Some(quote.clone()),
        ..Default::default()
    };
    let block = store.blocks().update(&exhibit.blocks[0].id, patch).await.unwrap();
    assert_eq!(block.content, quote);
    assert_eq!(block.panel_id, exhibit.panel.id);
}

#[tokio::test]
async fn test_update_and_clear_waypoint_coordinates() {
    let (store, _backend) = test_store();
    let collection = create_collection(&store, "Memory").await;
    let mut input = NewWaypoint::new("Gate");
    input.coordinates = Some(Coordinates { lat: -1.9, lng: 30.1 });
    let waypoint = store
        .waypoints()
        .create(&collection.id, input)
        .await
        .unwrap();
    assert_eq!(waypoint.order, 1);

    let patch = WaypointPatch {
        coordinates: Some(None),
        ..Default::default()
    };
    let waypoint = store.waypoints().update(&waypoint.id, patch).await.unwrap();
    assert_eq!(waypoint.coordinates, None);
    assert_eq!(waypoint.title, "Gate");
}

#[tokio::test]
async fn test_update_missing_node_is_not_found() {
    let (store, _backend) = test_store();
    create_exhibit(&store, "Memory").await;
    let patch = SectionPatch {
        title: Some("Renamed".into()),
        ..Default::default()
    };
    let err = store
        .sections()
        .update(&ID::from("missing"), patch)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vitrine::Error::Store(StoreError::NotFound {
            level: Level::Section,
            ..
        })
    ));
}

#[tokio::test]
async fn test_delete_section_cascades() {
    let config = StoreConfig::default().with_node_index(true);
    let (store, backend) = test_store_with(config);
    let exhibit = create_exhibit(&store, "Memory").await;
    let kept = create_section(&store, &exhibit.collection.id, "Departure").await;
    let index = store.node_index().unwrap();
    assert_eq!(index.len().await, 5);

    store.sections().delete(&exhibit.section.id).await.unwrap();

    let sections = store.sections().list(&exhibit.collection.id).await.unwrap();
    assert_eq!(sections, vec![kept.clone()]);
    for block in &exhibit.blocks {
        let err = store.blocks().get(&block.id).await.unwrap_err();
        assert!(err.is_not_found());
    }
    let err = store.panels().list(&exhibit.section.id).await.unwrap_err();
    assert!(err.is_not_found());

    let root = stored(&backend, &exhibit.collection.id).await;
    assert_eq!(root.node_ids().len(), 1);
    // Only the surviving section is still indexed
    assert_eq!(index.len().await, 1);
    assert_eq!(index.hint(&kept.id).await, Some(exhibit.collection.id.clone()));
}

#[tokio::test]
async fn test_delete_block_leaves_siblings() {
    let (store, _backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;

    store.blocks().delete(&exhibit.blocks[0].id).await.unwrap();
    let remaining = store.blocks().list(&exhibit.panel.id).await.unwrap();
    assert_eq!(remaining, vec![exhibit.blocks[1].clone()]);

    let err = store.blocks().delete(&exhibit.blocks[0].id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_reorder_full_list() {
    let (store, _backend) = test_store();
    let collection = create_collection(&store, "Memory").await;
    let a = create_section(&store, &collection.id, "A").await;
    let b = create_section(&store, &collection.id, "B").await;
    let c = create_section(&store, &collection.id, "C").await;

    let order = [c.id.clone(), a.id.clone(), b.id.clone()];
    let views = store.sections().reorder(&collection.id, &order).await.unwrap();
    let titles: Vec<_> = views.iter().map(|s| (s.title.as_str(), s.order)).collect();
    assert_eq!(titles, vec![("C", 1), ("A", 2), ("B", 3)]);
    assert_eq!(store.sections().list(&collection.id).await.unwrap(), views);

    // Applying the same order again changes nothing
    let again = store.sections().reorder(&collection.id, &order).await.unwrap();
    assert_eq!(again, views);
}

#[tokio::test]
async fn test_reorder_partial_list_keeps_unlisted_orders() {
    let (store, _backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;
    let third = create_text_block(&store, &exhibit.panel.id, "Third words").await;
    let (b1, b2) = (exhibit.blocks[0].id.clone(), exhibit.blocks[1].id.clone());

    // The listed blocks swap the orders they held between them
    let views = store
        .blocks()
        .reorder(&exhibit.panel.id, &[third.id.clone(), b1.clone()])
        .await
        .unwrap();
    let orders: Vec<_> = views.iter().map(|b| (b.id.clone(), b.order)).collect();
    assert_eq!(
        orders,
        vec![(third.id.clone(), 1), (b2.clone(), 2), (b1.clone(), 3)]
    );
    assert_eq!(store.blocks().list(&exhibit.panel.id).await.unwrap(), views);
}

#[tokio::test]
async fn test_reorder_keeps_orders_unique() {
    let (store, _backend) = test_store();
    let collection = create_collection(&store, "Memory").await;
    let a = create_section(&store, &collection.id, "A").await;
    let b = create_section(&store, &collection.id, "B").await;
    let c = create_section(&store, &collection.id, "C").await;

    let reorders = [
        vec![c.id.clone()],
        vec![c.id.clone(), a.id.clone()],
        vec![b.id.clone()],
        vec![a.id.clone(), c.id.clone(), b.id.clone()],
    ];
    for ids in reorders {
        let views = store.sections().reorder(&collection.id, &ids).await.unwrap();
        let mut orders: Vec<_> = views.iter().map(|s| s.order).collect();
        orders.dedup();
        assert_eq!(orders.len(), 3, "duplicate orders after reordering {ids:?}");
        assert!(orders.windows(2).all(|w| w[0] < w[1]));
    }

    let titles: Vec<_> = store
        .sections()
        .list(&collection.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.title, s.order))
        .collect();
    assert_eq!(
        titles,
        vec![("A".to_string(), 1), ("C".to_string(), 2), ("B".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_create_after_largest_order_is_rejected() {
    let (store, backend) = test_store();
    let collection = create_collection(&store, "Memory").await;
    create_section(&store, &collection.id, "Arrival").await;

    let mut root = stored(&backend, &collection.id).await;
    root.sections.as_mut().unwrap()[0].section_order = u64::MAX;
    backend
        .put(&collection.id, RootPatch::from_root(root, RootField::Sections))
        .await
        .unwrap();
    let revision = stored(&backend, &collection.id).await.revision;

    let err = store
        .sections()
        .create(&collection.id, NewSection::new("Departure"))
        .await
        .unwrap_err();
    match err {
        vitrine::Error::Store(StoreError::ValidationFailed { level, field, .. }) => {
            assert_eq!(level, Level::Section);
            assert_eq!(field, "order");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    let root = stored(&backend, &collection.id).await;
    assert_eq!(root.revision, revision);
    assert_eq!(root.sections.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reorder_rejects_bad_id_lists() {
    let (store, backend) = test_store();
    let exhibit = create_exhibit(&store, "Memory").await;
    let foreign = create_exhibit(&store, "Other").await;
    let revision = stored(&backend, &exhibit.collection.id).await.revision;
    let (b1, b2) = (exhibit.blocks[0].id.clone(), exhibit.blocks[1].id.clone());

    let bad_lists = [
        vec![],
        vec![b1.clone(), b2.clone(), b1.clone()],
        vec![b2.clone(), foreign.blocks[0].id.clone()],
    ];
    for ids in bad_lists {
        let err = store
            .blocks()
            .reorder(&exhibit.panel.id, &ids)
            .await
            .unwrap_err();
        match err {
            vitrine::Error::Store(StoreError::ValidationFailed { level, field, .. }) => {
                assert_eq!(level, Level::Block);
                assert_eq!(field, "ordered_ids");
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }
    assert_eq!(stored(&backend, &exhibit.collection.id).await.revision, revision);
}

#[tokio::test]
async fn test_nodes_in_separate_collections_are_independent() {
    let (store, _backend) = test_store();
    let first = create_exhibit(&store, "First").await;
    let second = create_exhibit(&store, "Second").await;

    store
        .panels()
        .create(&second.section.id, NewPanel::new("Extra"))
        .await
        .unwrap();

    assert_eq!(store.panels().list(&first.section.id).await.unwrap().len(), 1);
    assert_eq!(store.panels().list(&second.section.id).await.unwrap().len(), 2);
}
