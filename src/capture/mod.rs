// Capture adapters - per-resource snapshot producers

mod database;
mod files;
mod kv;
mod secrets;

pub use database::DatabaseCaptureAdapter;
pub use files::FileCaptureAdapter;
pub use kv::KvCaptureAdapter;
pub use secrets::SecretsCaptureAdapter;

use async_trait::async_trait;

/// Produces the raw byte snapshot for one resource type.
///
/// Adapters talk to external collaborators and return `anyhow::Result`; the
/// backup orchestrator maps any failure into
/// [`crate::backup::types::BackupError::CaptureFailed`].
#[async_trait]
pub trait CaptureAdapter: Send + Sync {
    async fn capture(&self) -> anyhow::Result<Vec<u8>>;
}
