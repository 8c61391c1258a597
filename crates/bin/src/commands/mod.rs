//! Command implementations for the Vitrine CLI.

use serde_json::Value;
use vitrine::{ID, document::Level};

use crate::{backend::Workspace, cli::Commands, output::OutputFormat};

pub mod collections;
pub mod nodes;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn parse_json(text: &str) -> Result<Value, Box<dyn std::error::Error>> {
    serde_json::from_str(text).map_err(|e| format!("--json is not valid JSON: {e}").into())
}

/// Runs one command against the workspace's store.
pub async fn run(workspace: &Workspace, command: Commands, format: OutputFormat) -> CommandResult {
    let store = &workspace.store;
    match command {
        Commands::Collections { name } => collections::list(store, name, format).await,
        Commands::Show { id } => collections::show(store, &ID::from(id), format).await,
        Commands::List { level, parent } => {
            nodes::list(store, level, &ID::from(parent), format).await
        }
        Commands::Create {
            level,
            parent,
            json,
        } => {
            let input = parse_json(&json)?;
            match (level, parent) {
                (Level::Collection, None) => collections::create(store, input, format).await,
                (Level::Collection, Some(_)) => Err("collections do not take a parent ID".into()),
                (level, Some(parent)) => {
                    nodes::create(store, level, &ID::from(parent), input, format).await
                }
                (level, None) => Err(format!("creating a {level} requires a parent ID").into()),
            }
        }
        Commands::Update { level, id, json } => {
            let input = parse_json(&json)?;
            let id = ID::from(id);
            match level {
                Level::Collection => collections::update(store, &id, input, format).await,
                level => nodes::update(store, level, &id, input, format).await,
            }
        }
        Commands::Delete { level, id } => {
            let id = ID::from(id);
            match level {
                Level::Collection => collections::delete(store, &id, format).await,
                level => nodes::delete(store, level, &id, format).await,
            }
        }
        Commands::Reorder { level, parent, ids } => {
            let ids: Vec<ID> = ids.into_iter().map(ID::from).collect();
            nodes::reorder(store, level, &ID::from(parent), &ids, format).await
        }
    }
}
