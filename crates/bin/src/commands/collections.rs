//! Commands on whole Collections.

use serde_json::Value;
use vitrine::{
    ExhibitStore, ID,
    backend::Filter,
    document::Level,
    mapper,
    view::{CollectionPatch, NewCollection},
};

use super::{CommandResult, nodes::deleted};
use crate::output::{OutputFormat, print_one, print_rows, print_tree};

pub async fn list(store: &ExhibitStore, name: Option<String>, format: OutputFormat) -> CommandResult {
    let filter = name.map(Filter::NameContains).unwrap_or_default();
    let collections = store.list_collections(&filter).await?;
    print_rows(&collections, format, "No collections")
}

pub async fn show(store: &ExhibitStore, id: &ID, format: OutputFormat) -> CommandResult {
    let tree = store.tree(id).await?;
    print_tree(&tree, format)
}

pub async fn create(store: &ExhibitStore, input: Value, format: OutputFormat) -> CommandResult {
    let input: NewCollection = mapper::parse_input(Level::Collection, input)?;
    let collection = store.create_collection(input).await?;
    print_one(&collection, format)
}

pub async fn update(store: &ExhibitStore, id: &ID, input: Value, format: OutputFormat) -> CommandResult {
    let patch: CollectionPatch = mapper::parse_input(Level::Collection, input)?;
    let collection = store.update_collection(id, patch).await?;
    print_one(&collection, format)
}

pub async fn delete(store: &ExhibitStore, id: &ID, format: OutputFormat) -> CommandResult {
    store.delete_collection(id).await?;
    deleted(Level::Collection, id, format)
}
