// Backup subsystem types - configs, run records, and the error taxonomy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::transform::TransformFlags;

/// Resource class a backup config snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupType {
    /// Relational schema metadata.
    Database,
    /// Full key-value store dump.
    KvStore,
    /// Allow-listed configuration files.
    Files,
    /// Redacted secret manifest (presence only, never values).
    Secrets,
}

impl BackupType {
    /// Stable wire/name form of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupType::Database => "database",
            BackupType::KvStore => "kv-store",
            BackupType::Files => "files",
            BackupType::Secrets => "secrets",
        }
    }
}

/// Identity and policy for a recurring backup job.
///
/// The `schedule` field is a cron expression interpreted by the external
/// scheduler; this crate never parses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    pub id: String,
    pub name: String,
    pub backup_type: BackupType,
    pub schedule: String,
    pub retention_days: u32,
    pub encryption_enabled: bool,
    pub compression_enabled: bool,
    /// Destination URI the storage gateway writes under.
    pub destination: String,
}

/// Execution state of one backup or restore run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Success,
    Failed,
}

impl RunStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failed)
    }
}

/// Record of one backup execution.
///
/// Created with `status = in_progress` the moment a run starts, mutated in
/// place to its terminal state, and removed only by the retention sweeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResult {
    pub id: String,
    pub config_id: String,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Length of the stored payload after any transform.
    pub size_bytes: u64,
    /// Hex SHA-256 of the raw capture payload, taken before any transform.
    pub checksum: String,
    /// Which transform stages produced the stored blob. Restore reverses
    /// exactly these, in the opposite order they were applied.
    pub transform: TransformFlags,
    /// Gateway key the blob lives under; set once the store step succeeds.
    pub storage_key: Option<String>,
    pub error: Option<String>,
}

impl BackupResult {
    /// Open a new in-progress record for one run of `config`.
    pub(crate) fn begin(config: &BackupConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config_id: config.id.clone(),
            status: RunStatus::InProgress,
            start_time: Utc::now(),
            end_time: None,
            size_bytes: 0,
            checksum: String::new(),
            transform: TransformFlags::from_config(
                config.compression_enabled,
                config.encryption_enabled,
            ),
            storage_key: None,
            error: None,
        }
    }

    pub(crate) fn complete(&mut self, checksum: String, size_bytes: u64, storage_key: String) {
        self.status = RunStatus::Success;
        self.end_time = Some(Utc::now());
        self.size_bytes = size_bytes;
        self.checksum = checksum;
        self.storage_key = Some(storage_key);
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.status = RunStatus::Failed;
        self.end_time = Some(Utc::now());
        self.error = Some(error);
    }
}

/// Input for one restore run. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreRequest {
    /// Id of the `BackupResult` to restore from.
    pub backup_id: String,
    /// Destination descriptor handed to the external apply collaborator.
    pub target: String,
    /// When set, verification runs but nothing is applied.
    pub dry_run: bool,
    /// Passed through to the apply collaborator.
    pub overwrite: bool,
}

/// Record of one restore execution. Same state machine as [`BackupResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResult {
    pub id: String,
    pub backup_id: String,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl RestoreResult {
    pub(crate) fn begin(backup_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            backup_id: backup_id.to_string(),
            status: RunStatus::InProgress,
            start_time: Utc::now(),
            end_time: None,
            error: None,
        }
    }

    pub(crate) fn complete(&mut self) {
        self.status = RunStatus::Success;
        self.end_time = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.status = RunStatus::Failed;
        self.end_time = Some(Utc::now());
        self.error = Some(error);
    }
}

/// Report from one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub deleted: usize,
    pub retained: usize,
}

/// Error taxonomy for the backup subsystem.
///
/// Every failure is recorded on the owning result record and also returned
/// to the caller; nothing is swallowed at this layer.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup config not found: {0}")]
    ConfigNotFound(String),

    #[error("No capture adapter registered for backup type: {0}")]
    UnsupportedType(String),

    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Transform failed: {0}")]
    TransformFailed(String),

    #[error("Storage failure: {0}")]
    StorageFailed(String),

    #[error("Apply failed: {0}")]
    ApplyFailed(String),
}
