// BackupService - the administrative surface over the orchestrators

use std::sync::Arc;
use std::time::Duration;

use super::orchestrator::BackupOrchestrator;
use super::registry::BackupRegistry;
use super::restore::{RestoreOrchestrator, RestoreTarget};
use super::retention::RetentionSweeper;
use super::types::{
    BackupConfig, BackupError, BackupResult, BackupType, RestoreRequest, RestoreResult,
    SweepOutcome,
};
use crate::capture::CaptureAdapter;
use crate::storage::StorageGateway;
use crate::transform::{KeyStore, TransformStage};

/// Wires the orchestrators, the sweeper, and the shared registries into one
/// administrative surface.
pub struct BackupService {
    registry: Arc<BackupRegistry>,
    orchestrator: BackupOrchestrator,
    restorer: RestoreOrchestrator,
    sweeper: RetentionSweeper,
}

impl BackupService {
    /// Assemble a service from its external collaborators: the storage
    /// gateway, the key-management store, and the restore apply target.
    pub fn new(
        storage: Arc<dyn StorageGateway>,
        keys: Arc<dyn KeyStore>,
        target: Arc<dyn RestoreTarget>,
    ) -> Self {
        let registry = Arc::new(BackupRegistry::new());
        let transform = Arc::new(TransformStage::new(keys));

        Self {
            orchestrator: BackupOrchestrator::new(
                Arc::clone(&registry),
                Arc::clone(&storage),
                Arc::clone(&transform),
            ),
            restorer: RestoreOrchestrator::new(
                Arc::clone(&registry),
                Arc::clone(&storage),
                transform,
                target,
            ),
            sweeper: RetentionSweeper::new(Arc::clone(&registry), storage),
            registry,
        }
    }

    /// Register the capture adapter for one backup type.
    pub fn with_adapter(
        mut self,
        backup_type: BackupType,
        adapter: Arc<dyn CaptureAdapter>,
    ) -> Self {
        self.orchestrator.register_adapter(backup_type, adapter);
        self
    }

    /// Retention window for results whose config has been removed.
    pub fn with_default_retention_days(mut self, days: u32) -> Self {
        self.sweeper = self.sweeper.with_default_retention_days(days);
        self
    }

    /// Register or replace a backup config.
    pub fn add_config(&self, config: BackupConfig) {
        self.registry.add_config(config);
    }

    /// Remove a config. Idempotent. Removes future runs only; historical
    /// results remain until the sweeper expires them.
    pub fn remove_config(&self, id: &str) {
        self.registry.remove_config(id);
    }

    /// Run one backup for the given config id, blocking until terminal.
    pub async fn execute_backup(&self, config_id: &str) -> Result<BackupResult, BackupError> {
        self.orchestrator.execute_backup(config_id).await
    }

    /// Run one restore, blocking until terminal.
    pub async fn execute_restore(
        &self,
        request: RestoreRequest,
    ) -> Result<RestoreResult, BackupError> {
        self.restorer.execute_restore(request).await
    }

    /// Current record of a backup run, or `None` if the id is unknown.
    pub fn backup_status(&self, backup_id: &str) -> Option<BackupResult> {
        self.registry.backup(backup_id)
    }

    /// Current record of a restore run, or `None` if the id is unknown.
    pub fn restore_status(&self, restore_id: &str) -> Option<RestoreResult> {
        self.registry.restore(restore_id)
    }

    /// All backup results, newest first.
    pub fn list_backups(&self) -> Vec<BackupResult> {
        self.registry.list_backups()
    }

    /// All restore results, newest first.
    pub fn list_restores(&self) -> Vec<RestoreResult> {
        self.registry.list_restores()
    }

    /// Run one retention sweep now.
    pub async fn sweep(&self) -> SweepOutcome {
        self.sweeper.sweep().await
    }

    /// Spawn the periodic retention sweeper.
    pub fn spawn_sweeper(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        self.sweeper.spawn_periodic(interval)
    }
}
