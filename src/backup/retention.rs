// Retention sweeper - removes expired runs and their stored blobs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::registry::BackupRegistry;
use super::types::SweepOutcome;
use crate::storage::StorageGateway;

/// Deletes backups whose age exceeds their config's retention window.
///
/// Each result's cutoff comes from its own config's `retention_days`;
/// results whose config has since been removed fall back to the sweeper's
/// default window.
#[derive(Clone)]
pub struct RetentionSweeper {
    registry: Arc<BackupRegistry>,
    storage: Arc<dyn StorageGateway>,
    default_retention_days: u32,
}

impl RetentionSweeper {
    pub fn new(registry: Arc<BackupRegistry>, storage: Arc<dyn StorageGateway>) -> Self {
        Self {
            registry,
            storage,
            default_retention_days: 30,
        }
    }

    /// Retention window applied to results whose config no longer exists.
    pub fn with_default_retention_days(mut self, days: u32) -> Self {
        self.default_retention_days = days;
        self
    }

    /// One sweep over every backup result.
    ///
    /// If the gateway refuses to delete a blob the registry entry is kept
    /// so the next sweep retries it.
    pub async fn sweep(&self) -> SweepOutcome {
        let now = Utc::now();
        let mut outcome = SweepOutcome::default();

        for result in self.registry.list_backups() {
            let retention_days = self
                .registry
                .config(&result.config_id)
                .map(|config| config.retention_days)
                .unwrap_or(self.default_retention_days);
            let cutoff = now - chrono::Duration::days(i64::from(retention_days));

            if result.start_time >= cutoff {
                outcome.retained += 1;
                continue;
            }

            if let Some(key) = &result.storage_key {
                if let Err(e) = self.storage.delete(key).await {
                    warn!(
                        backup_id = %result.id,
                        error = %e,
                        "failed to delete expired blob, retrying next sweep"
                    );
                    outcome.retained += 1;
                    continue;
                }
            }

            self.registry.remove_backup(&result.id);
            outcome.deleted += 1;
            info!(
                backup_id = %result.id,
                config_id = %result.config_id,
                "expired backup removed"
            );
        }

        outcome
    }

    /// Spawn a task that sweeps on a fixed interval until aborted.
    pub fn spawn_periodic(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let sweeper = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let outcome = sweeper.sweep().await;
                debug!(
                    deleted = outcome.deleted,
                    retained = outcome.retained,
                    "retention sweep finished"
                );
            }
        })
    }
}
