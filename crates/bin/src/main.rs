//! Vitrine command-line interface.
//!
//! Browses and edits exhibit collections kept in a JSON data file.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use backend::Workspace;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vitrine=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let workspace = Workspace::open(&cli.store).await?;
    let writes = cli.command.writes();

    commands::run(&workspace, cli.command, cli.format).await?;
    if writes {
        workspace.save().await?;
    }
    Ok(())
}
