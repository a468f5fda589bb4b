// Backup orchestrator - drives one backup run end to end:
// capture -> checksum -> transform -> store

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use super::registry::BackupRegistry;
use super::types::{BackupConfig, BackupError, BackupResult, BackupType};
use crate::capture::CaptureAdapter;
use crate::storage::StorageGateway;
use crate::transform::{sha256_hex, TransformFlags, TransformStage};

/// Owns the config registry and executes backup runs against it.
pub struct BackupOrchestrator {
    registry: Arc<BackupRegistry>,
    storage: Arc<dyn StorageGateway>,
    transform: Arc<TransformStage>,
    adapters: HashMap<BackupType, Arc<dyn CaptureAdapter>>,
}

impl BackupOrchestrator {
    pub fn new(
        registry: Arc<BackupRegistry>,
        storage: Arc<dyn StorageGateway>,
        transform: Arc<TransformStage>,
    ) -> Self {
        Self {
            registry,
            storage,
            transform,
            adapters: HashMap::new(),
        }
    }

    /// Register the capture adapter for one backup type. Configs whose type
    /// has no adapter fail their runs with `UnsupportedType`.
    pub fn register_adapter(&mut self, backup_type: BackupType, adapter: Arc<dyn CaptureAdapter>) {
        self.adapters.insert(backup_type, adapter);
    }

    /// Execute one backup run for a registered config.
    ///
    /// An unknown config id fails before any run record is created. Any
    /// later failure lands on the run's `BackupResult` and is also returned
    /// to the caller. The call blocks until the run reaches a terminal
    /// state.
    pub async fn execute_backup(&self, config_id: &str) -> Result<BackupResult, BackupError> {
        let config = self
            .registry
            .config(config_id)
            .ok_or_else(|| BackupError::ConfigNotFound(config_id.to_string()))?;

        let mut result = BackupResult::begin(&config);
        self.registry.put_backup(result.clone());

        info!(
            backup_id = %result.id,
            config_id = %config.id,
            backup_type = config.backup_type.as_str(),
            "starting backup run"
        );

        match self.run_pipeline(&config, &result.id).await {
            Ok((checksum, size_bytes, storage_key)) => {
                result.complete(checksum, size_bytes, storage_key);
                self.registry.put_backup(result.clone());
                info!(
                    backup_id = %result.id,
                    size_bytes = size_bytes,
                    "backup run succeeded"
                );
                Ok(result)
            }
            Err(e) => {
                result.fail(e.to_string());
                self.registry.put_backup(result.clone());
                error!(backup_id = %result.id, error = %e, "backup run failed");
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        config: &BackupConfig,
        backup_id: &str,
    ) -> Result<(String, u64, String), BackupError> {
        let adapter = self
            .adapters
            .get(&config.backup_type)
            .ok_or_else(|| BackupError::UnsupportedType(config.backup_type.as_str().to_string()))?;

        let raw = adapter
            .capture()
            .await
            .map_err(|e| BackupError::CaptureFailed(format!("{:#}", e)))?;

        // Integrity anchor: digest of the raw capture payload, taken before
        // any transform stage touches it.
        let checksum = sha256_hex(&raw);

        let flags = TransformFlags::from_config(config.compression_enabled, config.encryption_enabled);
        let transformed = self.transform.apply(raw, flags).await?;

        let storage_key = blob_key(&config.destination, backup_id);
        self.storage.store(&storage_key, &transformed).await?;

        Ok((checksum, transformed.len() as u64, storage_key))
    }
}

/// Gateway key for one run's blob: destination URI plus run id.
pub(crate) fn blob_key(destination: &str, backup_id: &str) -> String {
    format!("{}/{}", destination.trim_end_matches('/'), backup_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_key_joins_destination_and_run_id() {
        assert_eq!(blob_key("backups/db", "run-1"), "backups/db/run-1");
        assert_eq!(blob_key("backups/db/", "run-1"), "backups/db/run-1");
    }
}
