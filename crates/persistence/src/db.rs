//! Storage backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use crate::kv::{BackendError, FileBackend, KeyValueBackend, MemoryBackend};
use crate::repositories::KvTrackingStore;

/// Which backend holds the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    File,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub data_dir: PathBuf,
}

/// Opens the configured backend.
pub async fn open_backend(config: &StorageConfig) -> Result<Arc<dyn KeyValueBackend>, BackendError> {
    let backend: Arc<dyn KeyValueBackend> = match config.kind {
        StorageKind::Memory => Arc::new(MemoryBackend::new()),
        StorageKind::File => Arc::new(FileBackend::open(&config.data_dir).await?),
    };
    Ok(backend)
}

/// Opens the configured backend wrapped in a tracking store.
pub async fn open_store(config: &StorageConfig) -> Result<KvTrackingStore, BackendError> {
    Ok(KvTrackingStore::new(open_backend(config).await?))
}
