//! Persistence operations for the InMemory document store
//!
//! This module handles serialization and file I/O for saving/loading the
//! in-memory state to/from JSON files.

use std::{collections::HashMap, path::Path, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;

use super::{Documents, InMemory};
use crate::{Clock, Error, Result, backend::BackendError, document::RootDoc};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// On-disk layout: documents in creation order.
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    documents: Vec<RootDoc>,
}

/// Saves all root documents to a file as pretty-printed JSON.
pub(crate) async fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let documents = {
        let guard = backend.documents.read().await;
        guard
            .order
            .iter()
            .filter_map(|id| guard.by_id.get(id).cloned())
            .collect()
    };

    let serializable = SerializableStore {
        version: PERSISTENCE_VERSION,
        documents,
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads root documents from a JSON file.
///
/// A missing file yields an empty store.
pub(crate) async fn load_from_file<P: AsRef<Path>>(
    path: P,
    clock: Arc<dyn Clock>,
) -> Result<InMemory> {
    let store = InMemory::with_clock(clock);
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let serializable: SerializableStore = serde_json::from_str(&json).map_err(|e| -> Error {
                BackendError::DeserializationFailed { source: e }.into()
            })?;

            let mut by_id = HashMap::with_capacity(serializable.documents.len());
            let mut order = Vec::with_capacity(serializable.documents.len());
            for doc in serializable.documents {
                order.push(doc.id.clone());
                by_id.insert(doc.id.clone(), doc);
            }
            Ok(InMemory {
                documents: RwLock::new(Documents { by_id, order }),
                ..store
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(store),
        Err(e) => Err(BackendError::FileIo { source: e }.into()),
    }
}
