use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// In-memory staging store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStagingStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStagingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StagingStore for MemoryStagingStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError> {
        let total_bytes = data.len() as u64;
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;
        objects.insert(path.as_str().to_string(), data.to_vec());
        Ok(total_bytes)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        let objects = self
            .objects
            .lock()
            .map_err(|e| StagingStoreError::DownloadFailed(e.to_string()))?;
        objects
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| StagingStoreError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| StagingStoreError::DeleteFailed(e.to_string()))?;
        objects.remove(path.as_str());
        Ok(())
    }
}
