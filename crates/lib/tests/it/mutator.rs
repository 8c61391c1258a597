use std::collections::HashMap;

use serde_json::{Map, Value, json};
use vitrine::{
    ID,
    document::{Level, NodePath, ParentPath, RootDoc, StoredBlock, StoredPanel, StoredSection, StoredWaypoint},
    locator::find_path,
    mutator::{self, MutationError},
};

fn doc() -> RootDoc {
    serde_json::from_value(json!({
        "id": "c1",
        "name": "Memory",
        "sections": [{
            "id": "s1", "title": "Arrival", "sectionOrder": 1,
            "panels": [
                {"id": "p1", "title": "Welcome", "panelOrder": 1, "blocks": [
                    {"id": "b1", "type": "text", "blockOrder": 1, "content": {"body": "a"}},
                    {"id": "b2", "type": "text", "blockOrder": 2, "content": {"body": "b"}}
                ]},
                {"id": "p2", "title": "Names", "panelOrder": 2, "blocks": []}
            ]
        }],
        "waypoints": [{"id": "w1", "title": "Gate", "stopOrder": 1}]
    }))
    .unwrap()
}

fn block(kind: &str) -> StoredBlock {
    StoredBlock {
        id: ID::default(),
        kind: kind.to_string(),
        block_order: 0,
        content: json!({"body": "new"}),
        extra: Map::new(),
    }
}

#[test]
fn test_insert_appends_after_highest_order() {
    let mut root = doc();
    // Orders need not be dense
    root.sections.as_mut().unwrap()[0].panels.as_mut().unwrap()[0]
        .blocks
        .as_mut()
        .unwrap()[1]
        .block_order = 7;

    let parent = ParentPath::Panel {
        section: 0,
        panel: 0,
    };
    let (root, inserted) = mutator::insert(root, &parent, block("text")).unwrap();
    assert_eq!(inserted.block_order, 8);
    assert!(!inserted.id.is_empty());
    assert_eq!(
        find_path(&root, &inserted.id, Level::Block),
        Some(NodePath::Block {
            section: 0,
            panel: 0,
            block: 2
        })
    );

    let empty = ParentPath::Panel {
        section: 0,
        panel: 1,
    };
    let (_, first) = mutator::insert(root, &empty, block("text")).unwrap();
    assert_eq!(first.block_order, 1);
}

#[test]
fn test_delete_section_takes_its_subtree() {
    let (root, removed) =
        mutator::delete::<StoredSection>(doc(), &NodePath::Section { section: 0 }).unwrap();
    assert_eq!(removed.id, ID::from("s1"));
    assert_eq!(removed.panels.as_ref().map(Vec::len), Some(2));
    assert!(root.sections.unwrap().is_empty());
    // Waypoints live beside the sections and are untouched
    assert_eq!(root.waypoints.unwrap().len(), 1);
}

#[test]
fn test_update_merges_and_clears() {
    let mut fields = Map::new();
    fields.insert("theme".into(), json!("dark"));
    fields.insert("curatorNote".into(), json!("check dates"));
    let path = NodePath::Panel {
        section: 0,
        panel: 1,
    };
    let (root, panel) = mutator::update::<StoredPanel>(doc(), &path, &fields).unwrap();
    assert_eq!(panel.theme.as_deref(), Some("dark"));
    assert_eq!(panel.title, "Names");

    let mut fields = Map::new();
    fields.insert("theme".into(), Value::Null);
    let (_, panel) = mutator::update::<StoredPanel>(root, &path, &fields).unwrap();
    assert_eq!(panel.theme, None);
    assert_eq!(panel.extra.get("curatorNote"), Some(&json!("check dates")));
}

#[test]
fn test_update_refuses_managed_fields() {
    for key in ["id", "stopOrder"] {
        let mut fields = Map::new();
        fields.insert(key.into(), json!("x"));
        let err = mutator::update::<StoredWaypoint>(
            doc(),
            &NodePath::Waypoint { waypoint: 0 },
            &fields,
        )
        .unwrap_err();
        assert!(err.is_validation_error());
        assert!(matches!(
            err,
            vitrine::Error::Mutation(MutationError::ProtectedField { .. })
        ));
    }
}

#[test]
fn test_reorder_sorts_by_new_orders() {
    let parent = ParentPath::Panel {
        section: 0,
        panel: 0,
    };
    let orders = HashMap::from([(ID::from("b2"), 1), (ID::from("b1"), 2)]);
    let root = mutator::reorder::<StoredBlock>(doc(), &parent, &orders).unwrap();
    let blocks = root.sections.unwrap()[0].panels.clone().unwrap()[0]
        .blocks
        .clone()
        .unwrap();
    let ids: Vec<_> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b2", "b1"]);
    assert_eq!(blocks[0].block_order, 1);
}

#[test]
fn test_paths_out_of_bounds() {
    let err = mutator::delete::<StoredPanel>(
        doc(),
        &NodePath::Panel {
            section: 0,
            panel: 9,
        },
    )
    .unwrap_err();
    assert!(err.is_not_found());
}
