use serde_json::json;
use vitrine::{
    ID,
    backend::DocumentStore,
    document::{Depth, RootDoc},
    mapper::{self, Mapper},
    view::{BlockContent, BlockPatch, Coordinates, SectionPatch, WaypointPatch},
};

use super::helpers::*;

fn legacy_doc() -> RootDoc {
    serde_json::from_value(json!({
        "id": "c1",
        "name": "Memory",
        "description": "Permanent exhibition",
        "curator": "R. N.",
        "sections": [
            {"id": "s2", "title": "Later", "sectionOrder": 5, "panels": []},
            {
                "id": "s1", "title": "Arrival", "sectionOrder": 1, "mood": "quiet",
                "panels": [{
                    "id": "p1", "title": "Welcome", "panelOrder": 1,
                    "blocks": [
                        {"id": "b2", "type": "image", "blockOrder": 2, "content": {"url": "a.jpg", "caption": "Door"}},
                        {"id": "b1", "type": "text", "blockOrder": 1, "content": {"body": "Hi", "legacyStyle": "bold"}},
                        {"id": "b3", "type": "map", "blockOrder": 3, "content": {"zoom": 4}}
                    ]
                }]
            }
        ],
        "waypoints": [
            {"id": "w1", "title": "Gate", "stopOrder": 2, "location": {"latitude": -1.95, "longitude": 30.06}},
            {"id": "w0", "title": "Car park", "stopOrder": 1}
        ]
    }))
    .unwrap()
}

#[test]
fn test_tree_view_is_sorted_and_carries_parents() {
    let tree = mapper::tree_to_view(&legacy_doc());

    assert_eq!(tree.collection.name, "Memory");
    assert_eq!(tree.collection.attributes.get("curator"), Some(&json!("R. N.")));

    let titles: Vec<_> = tree.sections.iter().map(|s| s.section.title.as_str()).collect();
    assert_eq!(titles, vec!["Arrival", "Later"]);
    assert_eq!(tree.sections[0].section.collection_id, ID::from("c1"));
    assert_eq!(
        tree.sections[0].section.attributes.get("mood"),
        Some(&json!("quiet"))
    );

    let blocks = &tree.sections[0].panels[0].blocks;
    let ids: Vec<_> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2", "b3"]);
    assert!(blocks.iter().all(|b| b.panel_id == ID::from("p1")));

    let waypoints: Vec<_> = tree.waypoints.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(waypoints, vec!["w0", "w1"]);
    assert_eq!(
        tree.waypoints[1].coordinates,
        Some(Coordinates {
            lat: -1.95,
            lng: 30.06
        })
    );
}

#[test]
fn test_unrecognized_content_is_passed_through() {
    let tree = mapper::tree_to_view(&legacy_doc());
    let blocks = &tree.sections[0].panels[0].blocks;

    // Extra keys on a known kind do not fit the typed shape
    assert_eq!(
        blocks[0].content,
        BlockContent::Other {
            kind: "text".into(),
            content: json!({"body": "Hi", "legacyStyle": "bold"}),
        }
    );
    assert!(matches!(blocks[1].content, BlockContent::Image(_)));
    assert_eq!(blocks[2].content.kind(), "map");
}

#[tokio::test]
async fn test_editing_a_sibling_keeps_foreign_content_intact() {
    let (store, backend) = test_store();
    let root = backend.create(legacy_doc()).await.unwrap();

    store
        .blocks()
        .update(
            &ID::from("b2"),
            BlockPatch {
                content: Some(BlockContent::image("b.jpg")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = stored(&backend, &root.id).await;
    let before = legacy_doc();
    let blocks = |doc: &RootDoc| doc.sections.as_ref().unwrap()[1].panels.as_ref().unwrap()[0]
        .blocks
        .clone()
        .unwrap();
    assert_eq!(blocks(&after)[1], blocks(&before)[1]);
    assert_eq!(blocks(&after)[2], blocks(&before)[2]);
    assert_eq!(blocks(&after)[0].content, json!({"url": "b.jpg"}));
    assert_eq!(after.extra.get("curator"), Some(&json!("R. N.")));
}

#[test]
fn test_patches_map_to_storage_keys() {
    let patch: SectionPatch =
        mapper::parse_input(vitrine::document::Level::Section, json!({"description": null}))
            .unwrap();
    let fields = vitrine::document::StoredSection::patch_to_storage(&patch);
    assert_eq!(fields.get("description"), Some(&serde_json::Value::Null));
    assert!(!fields.contains_key("title"));

    let patch = WaypointPatch {
        coordinates: Some(Some(Coordinates { lat: 1.0, lng: 2.0 })),
        ..Default::default()
    };
    let fields = vitrine::document::StoredWaypoint::patch_to_storage(&patch);
    assert_eq!(
        fields.get("location"),
        Some(&json!({"latitude": 1.0, "longitude": 2.0}))
    );
}

#[test]
fn test_parse_input_rejects_wrong_shape() {
    let err = mapper::parse_input::<vitrine::view::NewSection>(
        vitrine::document::Level::Section,
        json!({"title": 3}),
    )
    .unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err.module(), "mapper");
}

#[tokio::test]
async fn test_collection_view_reads_root_scalars_only() {
    let (_store, backend) = test_store();
    backend.create(legacy_doc()).await.unwrap();
    let root = backend.get(&ID::from("c1"), Depth::ROOT).await.unwrap();
    let view = mapper::collection_to_view(&root);
    assert_eq!(view.description.as_deref(), Some("Permanent exhibition"));
    assert_eq!(view.revision, 0);
}
