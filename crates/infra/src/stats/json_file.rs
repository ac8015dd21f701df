//! JSON file stats store
//!
//! The whole record lives in one small JSON document. Writes go to a sibling
//! `.tmp` file which is then renamed over the target, so a crash mid-write
//! leaves the previous record intact.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use wikisave_core::StatsStore;
use wikisave_domain::{Result, SaveStats, WikiSaveError};

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    path: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_atomically(&self, data: &[u8]) -> std::io::Result<()> {
        let temp_path = self.path.with_extension("tmp");

        if let Some(parent) = temp_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file =
            fs::OpenOptions::new().write(true).create(true).truncate(true).open(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await
    }
}

fn infra(err: impl Into<InfraError>) -> WikiSaveError {
    let infra: InfraError = err.into();
    infra.into()
}

#[async_trait]
impl StatsStore for JsonFileStatsStore {
    async fn load(&self) -> Result<SaveStats> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stats file yet");
                return Ok(SaveStats::default());
            }
            Err(err) => return Err(infra(err)),
        };

        serde_json::from_slice(&data).map_err(infra)
    }

    async fn store(&self, stats: &SaveStats) -> Result<()> {
        let data = serde_json::to_vec_pretty(stats).map_err(infra)?;
        self.write_atomically(&data).await.map_err(infra)?;
        debug!(path = %self.path.display(), bytes = data.len(), "stats persisted");
        Ok(())
    }
}
