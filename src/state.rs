use crate::config::AppConfig;
use crate::logs::LogAggregator;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let storage = Arc::new(FileStore::open(&config.data_dir).await?) as Arc<dyn KeyValueStore>;

        Ok(Self { config, storage })
    }

    pub fn from_parts(config: Arc<AppConfig>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { config, storage }
    }

    /// Aggregator bucketing by the configured viewer offset.
    pub fn aggregator(&self) -> LogAggregator {
        LogAggregator::new(self.config.utc_offset)
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig::default());
        let storage = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        Self { config, storage }
    }
}
