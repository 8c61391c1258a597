//! CLI argument definitions for the Vitrine binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vitrine::{constants::DEFAULT_SCAN_LIMIT, document::Level};

use crate::output::OutputFormat;

/// Vitrine exhibit content store
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Vitrine: browse and edit exhibit collections stored as whole documents")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format
    #[arg(short, long, global = true, default_value = "human", env = "VITRINE_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments selecting and configuring the store
#[derive(clap::Args, Debug)]
pub struct StoreArgs {
    /// JSON file holding every collection; created on first write
    #[arg(
        short = 'D',
        long,
        global = true,
        default_value = "vitrine.json",
        env = "VITRINE_DATA_FILE"
    )]
    pub data_file: PathBuf,

    /// Maximum number of collections scanned when looking up a node by ID
    #[arg(long, global = true, default_value_t = DEFAULT_SCAN_LIMIT, env = "VITRINE_SCAN_LIMIT")]
    pub scan_limit: usize,

    /// Reject writes to a collection that changed since it was read
    #[arg(long, global = true, env = "VITRINE_OPTIMISTIC")]
    pub optimistic: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List collections
    Collections {
        /// Only collections whose name contains this text
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a collection with everything nested inside it
    Show { id: String },
    /// List the children of a node
    List {
        /// Level of the children: section, panel, block or waypoint
        #[arg(value_parser = parse_level)]
        level: Level,
        /// ID of the parent node
        parent: String,
    },
    /// Create a collection, or a node under a parent
    Create {
        #[arg(value_parser = parse_level)]
        level: Level,
        /// ID of the parent node; omitted for collections
        parent: Option<String>,
        /// Creation input as a JSON object
        #[arg(long)]
        json: String,
    },
    /// Update the supplied fields of a collection or node
    Update {
        #[arg(value_parser = parse_level)]
        level: Level,
        id: String,
        /// Fields to change as a JSON object; `null` clears a field
        #[arg(long)]
        json: String,
    },
    /// Delete a collection or node together with everything nested inside it
    Delete {
        #[arg(value_parser = parse_level)]
        level: Level,
        id: String,
    },
    /// Put the children of a parent in the given order
    Reorder {
        #[arg(value_parser = parse_level)]
        level: Level,
        parent: String,
        /// Child IDs in their new display order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

impl Commands {
    /// Whether the command may change stored data.
    pub fn writes(&self) -> bool {
        !matches!(
            self,
            Commands::Collections { .. } | Commands::Show { .. } | Commands::List { .. }
        )
    }
}

fn parse_level(value: &str) -> Result<Level, String> {
    value.parse()
}
