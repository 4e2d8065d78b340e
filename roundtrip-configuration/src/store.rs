use std::sync::Arc;

use roundtrip_store::{CacheStore, MemoryStore};
use serde::{Deserialize, Serialize};

/// Store shared by every cache layer of a pipeline.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// Process-local map, lost on exit.
    #[default]
    Memory,
}

impl StoreConfig {
    pub fn into_store(self) -> Arc<dyn CacheStore> {
        match self {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
        }
    }
}
