// Storage gateways - where transformed backup payloads live

mod filesystem;
mod memory;
#[cfg(feature = "s3")]
mod s3;

pub use filesystem::FileStorageGateway;
pub use memory::MemoryStorageGateway;
#[cfg(feature = "s3")]
pub use s3::{S3GatewayConfig, S3StorageGateway};

use async_trait::async_trait;

use crate::backup::types::BackupError;

/// Abstraction over the physical backup destination.
///
/// Keys are opaque to the gateway; the orchestrators derive them from the
/// config destination and the run id. Gateway failures surface as
/// [`BackupError::StorageFailed`] and terminate the owning run.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), BackupError>;

    async fn retrieve(&self, key: &str) -> Result<Vec<u8>, BackupError>;

    async fn delete(&self, key: &str) -> Result<(), BackupError>;
}
