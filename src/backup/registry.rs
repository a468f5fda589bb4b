// Shared run registries
//
// Owned exclusively by the orchestrators and the sweeper. Dashmap keeps
// concurrent runs safe; each run mutates only its own record.

use dashmap::DashMap;

use super::types::{BackupConfig, BackupResult, RestoreResult};

/// In-memory registries for configs and run records.
#[derive(Default)]
pub struct BackupRegistry {
    configs: DashMap<String, BackupConfig>,
    backups: DashMap<String, BackupResult>,
    restores: DashMap<String, RestoreResult>,
}

impl BackupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a config under its id.
    pub fn add_config(&self, config: BackupConfig) {
        self.configs.insert(config.id.clone(), config);
    }

    /// Remove a config. Idempotent; historical results stay untouched.
    pub fn remove_config(&self, id: &str) {
        self.configs.remove(id);
    }

    pub fn config(&self, id: &str) -> Option<BackupConfig> {
        self.configs.get(id).map(|entry| entry.value().clone())
    }

    pub fn backup(&self, id: &str) -> Option<BackupResult> {
        self.backups.get(id).map(|entry| entry.value().clone())
    }

    pub fn restore(&self, id: &str) -> Option<RestoreResult> {
        self.restores.get(id).map(|entry| entry.value().clone())
    }

    /// All backup results, newest first.
    pub fn list_backups(&self) -> Vec<BackupResult> {
        let mut results: Vec<_> = self
            .backups
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        results.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        results
    }

    /// All restore results, newest first.
    pub fn list_restores(&self) -> Vec<RestoreResult> {
        let mut results: Vec<_> = self
            .restores
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        results.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        results
    }

    pub(crate) fn put_backup(&self, result: BackupResult) {
        self.backups.insert(result.id.clone(), result);
    }

    pub(crate) fn put_restore(&self, result: RestoreResult) {
        self.restores.insert(result.id.clone(), result);
    }

    pub(crate) fn remove_backup(&self, id: &str) {
        self.backups.remove(id);
    }
}
