// Filesystem storage gateway

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::StorageGateway;
use crate::backup::types::BackupError;
use crate::transform::sha256_hex;

/// Stores each blob as one file under a root directory.
pub struct FileStorageGateway {
    root: PathBuf,
}

impl FileStorageGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn ensure_root_exists(&self) -> Result<(), BackupError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await.map_err(|e| {
                BackupError::StorageFailed(format!("failed to create storage root: {}", e))
            })?;
        }
        Ok(())
    }

    // Keys contain URI separators; flatten them into one filename and pin a
    // digest suffix so distinct keys can never collide after flattening.
    fn blob_path(&self, key: &str) -> PathBuf {
        let flattened: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let digest = sha256_hex(key.as_bytes());
        self.root.join(format!("{}-{}.blob", flattened, &digest[..12]))
    }
}

#[async_trait]
impl StorageGateway for FileStorageGateway {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), BackupError> {
        self.ensure_root_exists().await?;

        let path = self.blob_path(key);
        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to create blob file: {}", e)))?;
        file.write_all(data)
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to write blob: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to flush blob: {}", e)))?;
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Vec<u8>, BackupError> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Err(BackupError::StorageFailed(format!("blob not found: {}", key)));
        }
        fs::read(&path)
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to read blob: {}", e)))
    }

    async fn delete(&self, key: &str) -> Result<(), BackupError> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| BackupError::StorageFailed(format!("failed to delete blob: {}", e)))?;
        }
        Ok(())
    }
}
