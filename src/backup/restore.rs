// Restore orchestrator - retrieve -> reverse transform -> verify -> apply

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::registry::BackupRegistry;
use super::types::{BackupError, BackupResult, RestoreRequest, RestoreResult};
use crate::storage::StorageGateway;
use crate::transform::{sha256_hex, TransformStage};

/// External apply collaborator. Receives the fully reversed payload and the
/// target descriptor; what "apply" means is target-specific and out of
/// scope here.
#[async_trait]
pub trait RestoreTarget: Send + Sync {
    async fn apply(&self, data: &[u8], target: &str, overwrite: bool) -> anyhow::Result<()>;
}

/// Drives restore runs against recorded backups.
pub struct RestoreOrchestrator {
    registry: Arc<BackupRegistry>,
    storage: Arc<dyn StorageGateway>,
    transform: Arc<TransformStage>,
    target: Arc<dyn RestoreTarget>,
}

impl RestoreOrchestrator {
    pub fn new(
        registry: Arc<BackupRegistry>,
        storage: Arc<dyn StorageGateway>,
        transform: Arc<TransformStage>,
        target: Arc<dyn RestoreTarget>,
    ) -> Self {
        Self {
            registry,
            storage,
            transform,
            target,
        }
    }

    /// Execute one restore run.
    ///
    /// The backup id must resolve to a run that stored a blob; otherwise
    /// the call fails with `BackupNotFound` before any restore record is
    /// created. Verification happens after the transform is reversed: the
    /// recovered content is checked against the run's checksum anchor, and
    /// a mismatch aborts before anything is applied.
    pub async fn execute_restore(
        &self,
        request: RestoreRequest,
    ) -> Result<RestoreResult, BackupError> {
        let backup = self
            .registry
            .backup(&request.backup_id)
            .ok_or_else(|| BackupError::BackupNotFound(request.backup_id.clone()))?;

        let storage_key = backup.storage_key.clone().ok_or_else(|| {
            BackupError::BackupNotFound(format!(
                "backup {} has no stored payload to restore",
                backup.id
            ))
        })?;

        let mut result = RestoreResult::begin(&request.backup_id);
        self.registry.put_restore(result.clone());

        info!(
            restore_id = %result.id,
            backup_id = %backup.id,
            dry_run = request.dry_run,
            "starting restore run"
        );

        match self.run_pipeline(&backup, &storage_key, &request).await {
            Ok(()) => {
                result.complete();
                self.registry.put_restore(result.clone());
                info!(restore_id = %result.id, "restore run succeeded");
                Ok(result)
            }
            Err(e) => {
                result.fail(e.to_string());
                self.registry.put_restore(result.clone());
                error!(restore_id = %result.id, error = %e, "restore run failed");
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        backup: &BackupResult,
        storage_key: &str,
        request: &RestoreRequest,
    ) -> Result<(), BackupError> {
        let blob = self.storage.retrieve(storage_key).await?;

        // Reverse the recorded transform first, then verify the recovered
        // content against the checksum anchor, which covers the raw capture
        // bytes. Corruption of the stored blob surfaces either as a failed
        // decrypt/decompress or as a digest mismatch here.
        let content = self.transform.reverse(blob, backup.transform).await?;

        let actual = sha256_hex(&content);
        if actual != backup.checksum {
            return Err(BackupError::ChecksumMismatch {
                expected: backup.checksum.clone(),
                actual,
            });
        }

        if request.dry_run {
            debug!(backup_id = %backup.id, "dry run, verification only, skipping apply");
            return Ok(());
        }

        self.target
            .apply(&content, &request.target, request.overwrite)
            .await
            .map_err(|e| BackupError::ApplyFailed(format!("{:#}", e)))
    }
}
