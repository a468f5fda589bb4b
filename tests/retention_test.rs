// Retention sweeper behavior: per-config windows, orphaned results, and
// gateway deletion of expired blobs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storevault::backup::{
    BackupConfig, BackupService, BackupType, RestoreTarget,
};
use storevault::capture::CaptureAdapter;
use storevault::storage::{MemoryStorageGateway, StorageGateway};
use storevault::transform::MemoryKeyStore;

struct StaticCapture;

#[async_trait]
impl CaptureAdapter for StaticCapture {
    async fn capture(&self) -> anyhow::Result<Vec<u8>> {
        Ok(b"{\"resource\": \"files\"}".to_vec())
    }
}

struct NoopTarget;

#[async_trait]
impl RestoreTarget for NoopTarget {
    async fn apply(&self, _data: &[u8], _target: &str, _overwrite: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

// Delegates to an in-memory gateway while recording every deleted key.
struct RecordingGateway {
    inner: MemoryStorageGateway,
    deleted: Mutex<Vec<String>>,
}

impl RecordingGateway {
    fn new() -> Self {
        Self {
            inner: MemoryStorageGateway::new(),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageGateway for RecordingGateway {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), storevault::backup::BackupError> {
        self.inner.store(key, data).await
    }

    async fn retrieve(&self, key: &str) -> Result<Vec<u8>, storevault::backup::BackupError> {
        self.inner.retrieve(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), storevault::backup::BackupError> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.inner.delete(key).await
    }
}

fn files_config(id: &str, retention_days: u32) -> BackupConfig {
    BackupConfig {
        id: id.to_string(),
        name: format!("config {}", id),
        backup_type: BackupType::Files,
        schedule: "@daily".to_string(),
        retention_days,
        encryption_enabled: false,
        compression_enabled: false,
        destination: "backups/files".to_string(),
    }
}

fn service_with(gateway: Arc<RecordingGateway>) -> BackupService {
    BackupService::new(gateway, Arc::new(MemoryKeyStore::new()), Arc::new(NoopTarget))
        .with_adapter(BackupType::Files, Arc::new(StaticCapture))
}

#[tokio::test]
async fn expired_backup_is_deleted_from_registry_and_gateway() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = service_with(gateway.clone());

    // A zero-day window expires a run as soon as it finishes.
    service.add_config(files_config("cfg-expire", 0));
    let backup = service.execute_backup("cfg-expire").await.unwrap();
    let key = backup.storage_key.clone().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let outcome = service.sweep().await;

    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.retained, 0);
    assert!(service.list_backups().is_empty());
    assert_eq!(gateway.deleted.lock().unwrap().as_slice(), &[key.clone()]);
    assert!(gateway.retrieve(&key).await.is_err());
}

#[tokio::test]
async fn each_config_uses_its_own_retention_window() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = service_with(gateway.clone());

    service.add_config(files_config("cfg-keep", 30));
    service.add_config(files_config("cfg-expire", 0));

    let kept = service.execute_backup("cfg-keep").await.unwrap();
    service.execute_backup("cfg-expire").await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let outcome = service.sweep().await;

    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.retained, 1);

    let remaining = service.list_backups();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[tokio::test]
async fn orphaned_results_fall_back_to_the_default_window() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = BackupService::new(
        gateway.clone(),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(NoopTarget),
    )
    .with_adapter(BackupType::Files, Arc::new(StaticCapture))
    .with_default_retention_days(0);

    // A generous per-config window, then the config disappears.
    service.add_config(files_config("cfg-orphan", 365));
    service.execute_backup("cfg-orphan").await.unwrap();
    service.remove_config("cfg-orphan");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let outcome = service.sweep().await;

    assert_eq!(outcome.deleted, 1);
    assert!(service.list_backups().is_empty());
}

#[tokio::test]
async fn fresh_backups_are_retained() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = service_with(gateway.clone());

    service.add_config(files_config("cfg-keep", 14));
    let backup = service.execute_backup("cfg-keep").await.unwrap();

    let outcome = service.sweep().await;

    assert_eq!(outcome.deleted, 0);
    assert_eq!(outcome.retained, 1);
    assert!(service.backup_status(&backup.id).is_some());
    assert!(gateway.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn periodic_sweeper_runs_until_aborted() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = service_with(gateway.clone());

    service.add_config(files_config("cfg-expire", 0));
    service.execute_backup("cfg-expire").await.unwrap();

    let handle = service.spawn_sweeper(std::time::Duration::from_millis(20));
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    handle.abort();

    assert!(service.list_backups().is_empty());
}
