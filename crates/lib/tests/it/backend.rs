use serde_json::json;
use vitrine::{
    ID,
    backend::{BackendError, DocumentStore, Filter, RootPatch, database::InMemory},
    document::{Depth, RootDoc, RootField},
};

use super::helpers::*;

fn nested_doc(id: &str, name: &str) -> RootDoc {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "sections": [{
            "id": format!("{id}-s1"),
            "title": "Arrival",
            "sectionOrder": 1,
            "panels": [{
                "id": format!("{id}-p1"),
                "title": "Welcome",
                "panelOrder": 1,
                "blocks": [{"id": format!("{id}-b1"), "type": "text", "blockOrder": 1, "content": {"body": "Hi"}}]
            }]
        }],
        "waypoints": [{"id": format!("{id}-w1"), "title": "Gate", "stopOrder": 1}]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_get_materializes_requested_depth() {
    let backend = test_backend();
    backend.create(nested_doc("c1", "Memory")).await.unwrap();
    let id = ID::from("c1");

    let root = backend.get(&id, Depth::ROOT).await.unwrap();
    assert!(root.sections.is_none());
    assert!(root.waypoints.is_none());

    let root = backend.get(&id, Depth::SECTIONS).await.unwrap();
    let sections = root.sections.unwrap();
    assert_eq!(sections.len(), 1);
    assert!(sections[0].panels.is_none());
    assert_eq!(root.waypoints.unwrap().len(), 1);

    let root = backend.get(&id, Depth::PANELS).await.unwrap();
    let panels = root.sections.unwrap()[0].panels.clone().unwrap();
    assert!(panels[0].blocks.is_none());

    let root = backend.get(&id, Depth::FULL).await.unwrap();
    let blocks = root.sections.unwrap()[0].panels.clone().unwrap()[0]
        .blocks
        .clone()
        .unwrap();
    assert_eq!(blocks[0].id, ID::from("c1-b1"));
}

#[tokio::test]
async fn test_shallow_read_then_waypoint_put_keeps_nested_sections() {
    let backend = test_backend();
    backend.create(nested_doc("c1", "Memory")).await.unwrap();
    let id = ID::from("c1");

    let mut root = backend.get(&id, Depth::SECTIONS).await.unwrap();
    root.waypoints.as_mut().unwrap().clear();
    backend
        .put(&id, RootPatch::from_root(root, RootField::Waypoints))
        .await
        .unwrap();

    let full = stored(&backend, &id).await;
    assert_eq!(full.waypoints.as_ref().map(Vec::len), Some(0));
    assert_eq!(full, {
        let mut expected = nested_doc("c1", "Memory");
        expected.waypoints = Some(Vec::new());
        expected.created_at = full.created_at;
        expected.updated_at = full.updated_at;
        expected.revision = full.revision;
        expected
    });
}

#[tokio::test]
async fn test_find_respects_filter_and_limit() {
    let backend = test_backend();
    for (id, name) in [("a", "Memory Hall"), ("b", "Garden"), ("c", "Hall of Names")] {
        backend.create(RootDoc::new(ID::from(id), name, 0)).await.unwrap();
    }

    let all = backend.find(&Filter::All, Depth::ROOT, usize::MAX).await.unwrap();
    let ids: Vec<_> = all.iter().map(|root| root.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let limited = backend.find(&Filter::All, Depth::ROOT, 2).await.unwrap();
    assert_eq!(limited.len(), 2);

    let halls = backend
        .find(&Filter::NameContains("hall".into()), Depth::ROOT, usize::MAX)
        .await
        .unwrap();
    assert_eq!(halls.len(), 2);

    let picked = backend
        .find(&Filter::Ids(vec![ID::from("c")]), Depth::ROOT, usize::MAX)
        .await
        .unwrap();
    assert_eq!(picked[0].name, "Hall of Names");
}

#[tokio::test]
async fn test_put_increments_revision_and_touches_updated_at() {
    let backend = test_backend();
    let created = backend.create(RootDoc::new(ID::from("c1"), "Old", 0)).await.unwrap();
    assert_eq!(created.revision, 0);

    let written = backend
        .put(&created.id, RootPatch::new().with_name("New"))
        .await
        .unwrap();
    assert_eq!(written.revision, 1);
    assert_eq!(written.name, "New");
    assert!(written.updated_at > created.updated_at);
    assert_eq!(written.created_at, created.created_at);
}

#[tokio::test]
async fn test_put_with_stale_revision_conflicts() {
    let backend = test_backend();
    let created = backend.create(RootDoc::new(ID::from("c1"), "Old", 0)).await.unwrap();
    backend
        .put(&created.id, RootPatch::new().with_name("First"))
        .await
        .unwrap();

    let err = backend
        .put(
            &created.id,
            RootPatch::new().with_name("Second").expecting_revision(0),
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(
        err,
        vitrine::Error::Backend(BackendError::RevisionConflict {
            expected: 0,
            actual: 1,
            ..
        })
    ));
    assert_eq!(stored(&backend, &created.id).await.name, "First");
}

#[tokio::test]
async fn test_failed_put_leaves_document_unchanged() {
    let backend = test_backend();
    backend.create(nested_doc("c1", "Memory")).await.unwrap();
    let id = ID::from("c1");
    let before = stored(&backend, &id).await;

    backend.fail_next_puts(1);
    let err = backend
        .put(&id, RootPatch::new().with_name("Lost").with_extra("theme", json!("dark")))
        .await
        .unwrap_err();
    assert!(err.is_persist_failure());
    assert_eq!(stored(&backend, &id).await, before);

    // Only one failure was injected
    backend.put(&id, RootPatch::new().with_name("Kept")).await.unwrap();
    assert_eq!(stored(&backend, &id).await.name, "Kept");
}

#[tokio::test]
async fn test_unavailable_store_rejects_reads_and_writes() {
    let backend = test_backend();
    backend.create(RootDoc::new(ID::from("c1"), "Memory", 0)).await.unwrap();
    backend.set_available(false);

    let err = backend.get(&ID::from("c1"), Depth::ROOT).await.unwrap_err();
    assert!(err.is_unavailable());
    let err = backend.find(&Filter::All, Depth::ROOT, 10).await.unwrap_err();
    assert!(err.is_unavailable());
    let err = backend
        .put(&ID::from("c1"), RootPatch::new().with_name("x"))
        .await
        .unwrap_err();
    assert!(err.is_persist_failure());

    backend.set_available(true);
    assert!(backend.get(&ID::from("c1"), Depth::ROOT).await.is_ok());
}

#[tokio::test]
async fn test_create_and_remove() {
    let backend = test_backend();
    backend.create(RootDoc::new(ID::from("c1"), "Memory", 0)).await.unwrap();

    let err = backend
        .create(RootDoc::new(ID::from("c1"), "Again", 0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vitrine::Error::Backend(BackendError::DocumentExists { .. })
    ));

    backend.remove(&ID::from("c1")).await.unwrap();
    let err = backend.get(&ID::from("c1"), Depth::ROOT).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_save_load_keeps_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vitrine.json");

    let mut doc = nested_doc("c1", "Memory");
    doc.extra.insert("curator".into(), json!("R. N."));
    let backend = test_backend();
    backend.create(doc).await.unwrap();
    backend.save_to_file(&path).await.unwrap();

    let loaded = InMemory::load_from_file(&path).await.unwrap();
    let root = stored(&loaded, &ID::from("c1")).await;
    assert_eq!(root.extra.get("curator"), Some(&json!("R. N.")));
    assert_eq!(root, stored(&backend, &ID::from("c1")).await);
}

#[tokio::test]
async fn test_load_rejects_unknown_format_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vitrine.json");
    std::fs::write(&path, r#"{"_v": 9, "documents": []}"#).unwrap();

    let err = InMemory::load_from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        vitrine::Error::Backend(BackendError::DeserializationFailed { .. })
    ));
}
