use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::config::Config;
use crate::service::Analyzer;
use crate::store::{DirectoryStore, MemoryStore, RecordStore};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Runs and fetches analyses.
    pub analyzer: Analyzer,

    /// When the server came up.
    pub started: Instant,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            started: Instant::now(),
        }
    }

    /// Build the store and analyzer described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.data_dir {
            Some(dir) => {
                info!("persisting analyses under {}", dir.display());
                Arc::new(
                    DirectoryStore::open(dir)
                        .with_context(|| format!("opening data dir {}", dir.display()))?,
                )
            }
            None => {
                info!("persisting analyses in memory");
                Arc::new(MemoryStore::new())
            }
        };

        if let Some(dir) = &config.upload_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating upload dir {}", dir.display()))?;
        }

        let analyzer = Analyzer::new(store)
            .with_options(config.inference_options())
            .with_upload_dir(config.upload_dir.clone())
            .with_parallel_min_rows(config.parallel_columns_min_rows);
        Ok(Self::new(analyzer))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
