// In-memory storage gateway, used by tests and single-process deployments

use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageGateway;
use crate::backup::types::BackupError;

/// Keeps blobs in a concurrent map. Contents die with the process.
#[derive(Default)]
pub struct MemoryStorageGateway {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryStorageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl StorageGateway for MemoryStorageGateway {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), BackupError> {
        self.blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Vec<u8>, BackupError> {
        self.blobs
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackupError::StorageFailed(format!("blob not found: {}", key)))
    }

    async fn delete(&self, key: &str) -> Result<(), BackupError> {
        self.blobs.remove(key);
        Ok(())
    }
}
