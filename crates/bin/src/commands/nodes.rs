//! Commands on Sections, Panels, Blocks and Waypoints.

use serde_json::{Value, json};
use vitrine::{
    ExhibitStore, ID,
    document::Level,
    mapper::{self, Mapper, MappingError},
    store::Nodes,
};

use super::CommandResult;
use crate::output::{OutputFormat, Row, print_one, print_rows};

/// Runs `$body` with `$nodes` bound to the handle for `$level`.
macro_rules! at_level {
    ($store:expr, $level:expr, $operation:literal, |$nodes:ident| $body:expr) => {
        match $level {
            Level::Section => {
                let $nodes = $store.sections();
                $body
            }
            Level::Panel => {
                let $nodes = $store.panels();
                $body
            }
            Level::Block => {
                let $nodes = $store.blocks();
                $body
            }
            Level::Waypoint => {
                let $nodes = $store.waypoints();
                $body
            }
            Level::Collection => Err(vitrine::Error::from(MappingError::UnsupportedLevel {
                level: Level::Collection,
                operation: $operation.to_string(),
            })
            .into()),
        }
    };
}

pub async fn list(store: &ExhibitStore, level: Level, parent: &ID, format: OutputFormat) -> CommandResult {
    at_level!(store, level, "list by parent", |nodes| list_in(nodes, parent, format).await)
}

pub async fn create(
    store: &ExhibitStore,
    level: Level,
    parent: &ID,
    input: Value,
    format: OutputFormat,
) -> CommandResult {
    at_level!(store, level, "create under a parent", |nodes| {
        create_in(nodes, parent, input, format).await
    })
}

pub async fn update(
    store: &ExhibitStore,
    level: Level,
    id: &ID,
    input: Value,
    format: OutputFormat,
) -> CommandResult {
    at_level!(store, level, "update", |nodes| update_in(nodes, id, input, format).await)
}

pub async fn delete(store: &ExhibitStore, level: Level, id: &ID, format: OutputFormat) -> CommandResult {
    at_level!(store, level, "delete", |nodes| {
        nodes.delete(id).await?;
        deleted(level, id, format)
    })
}

pub async fn reorder(
    store: &ExhibitStore,
    level: Level,
    parent: &ID,
    ids: &[ID],
    format: OutputFormat,
) -> CommandResult {
    at_level!(store, level, "reorder", |nodes| {
        let views = nodes.reorder(parent, ids).await?;
        print_rows(&views, format, "")
    })
}

async fn list_in<N>(nodes: Nodes<'_, N>, parent: &ID, format: OutputFormat) -> CommandResult
where
    N: Mapper,
    N::View: Row,
{
    let views = nodes.list(parent).await?;
    print_rows(&views, format, &format!("No {}s under {parent}", N::LEVEL))
}

async fn create_in<N>(nodes: Nodes<'_, N>, parent: &ID, input: Value, format: OutputFormat) -> CommandResult
where
    N: Mapper,
    N::View: Row,
{
    let input: N::New = mapper::parse_input(N::LEVEL, input)?;
    let view = nodes.create(parent, input).await?;
    print_one(&view, format)
}

async fn update_in<N>(nodes: Nodes<'_, N>, id: &ID, input: Value, format: OutputFormat) -> CommandResult
where
    N: Mapper,
    N::View: Row,
{
    let patch: N::Patch = mapper::parse_input(N::LEVEL, input)?;
    let view = nodes.update(id, patch).await?;
    print_one(&view, format)
}

/// Confirms a deletion in the selected format.
pub fn deleted(level: Level, id: &ID, format: OutputFormat) -> CommandResult {
    match format {
        OutputFormat::Human => println!("Deleted {level} {id}"),
        OutputFormat::Json => println!("{}", json!({ "deleted": id, "level": level })),
    }
    Ok(())
}
