//! Backend creation and persistence for a CLI invocation.

use std::path::PathBuf;
use std::sync::Arc;

use vitrine::{
    ExhibitStore,
    backend::database::InMemory,
    store::{ConcurrencyMode, StoreConfig},
};

use crate::cli::StoreArgs;

/// The store a command runs against, bound to the file it was loaded from.
pub struct Workspace {
    pub store: ExhibitStore,
    backend: Arc<InMemory>,
    data_file: PathBuf,
}

impl Workspace {
    /// Loads every collection from the data file, starting empty if the file
    /// does not exist yet.
    pub async fn open(args: &StoreArgs) -> Result<Self, Box<dyn std::error::Error>> {
        tracing::debug!("Loading collections from {}", args.data_file.display());
        let backend = Arc::new(InMemory::load_from_file(&args.data_file).await?);

        let concurrency = if args.optimistic {
            ConcurrencyMode::Optimistic
        } else {
            ConcurrencyMode::LastWriteWins
        };
        let config = StoreConfig::default()
            .with_scan_limit(args.scan_limit)
            .with_concurrency(concurrency);
        let store = ExhibitStore::with_config(backend.clone(), config);

        Ok(Self {
            store,
            backend,
            data_file: args.data_file.clone(),
        })
    }

    /// Writes every collection back to the data file.
    pub async fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = self.data_file.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }
        self.backend.save_to_file(&self.data_file).await?;
        tracing::debug!("Saved collections to {}", self.data_file.display());
        Ok(())
    }
}
