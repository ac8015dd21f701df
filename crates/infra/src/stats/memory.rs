use async_trait::async_trait;
use parking_lot::Mutex;
use wikisave_core::StatsStore;
use wikisave_domain::{Result, SaveStats};

/// Process-lifetime [`StatsStore`].
#[derive(Debug, Default)]
pub struct InMemoryStatsStore {
    stats: Mutex<SaveStats>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn load(&self) -> Result<SaveStats> {
        Ok(self.stats.lock().clone())
    }

    async fn store(&self, stats: &SaveStats) -> Result<()> {
        *self.stats.lock() = stats.clone();
        Ok(())
    }
}
