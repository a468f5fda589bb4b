//! # StoreVault
//!
//! Backup and restore engine for the embedded commerce platform.
//!
//! ## Overview
//!
//! StoreVault snapshots heterogeneous platform resources - relational schema
//! metadata, the key-value store, configuration files, and redacted secret
//! manifests - through one pipeline: capture, checksum, optional compression
//! and authenticated encryption, then persistence to a storage gateway.
//! Restore reverses the pipeline and verifies the recovered content against
//! the checksum recorded at capture time before anything is applied.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use storevault::backup::{BackupConfig, BackupService, BackupType, RestoreTarget};
//! use storevault::capture::CaptureAdapter;
//! use storevault::storage::MemoryStorageGateway;
//! use storevault::transform::MemoryKeyStore;
//!
//! struct SchemaDump;
//!
//! #[async_trait::async_trait]
//! impl CaptureAdapter for SchemaDump {
//!     async fn capture(&self) -> anyhow::Result<Vec<u8>> {
//!         Ok(b"{\"tables\": []}".to_vec())
//!     }
//! }
//!
//! struct NoopTarget;
//!
//! #[async_trait::async_trait]
//! impl RestoreTarget for NoopTarget {
//!     async fn apply(&self, _data: &[u8], _target: &str, _overwrite: bool) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = BackupService::new(
//!     Arc::new(MemoryStorageGateway::new()),
//!     Arc::new(MemoryKeyStore::new()),
//!     Arc::new(NoopTarget),
//! )
//! .with_adapter(BackupType::Database, Arc::new(SchemaDump));
//!
//! service.add_config(BackupConfig {
//!     id: "nightly-schema".to_string(),
//!     name: "Nightly schema snapshot".to_string(),
//!     backup_type: BackupType::Database,
//!     schedule: "0 3 * * *".to_string(),
//!     retention_days: 14,
//!     encryption_enabled: false,
//!     compression_enabled: true,
//!     destination: "backups/schema".to_string(),
//! });
//!
//! let result = service.execute_backup("nightly-schema").await?;
//! assert_eq!(result.checksum.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Typed capture adapters**: one adapter per resource class, pluggable
//!   behind a single async trait
//! - **Integrity anchoring**: SHA-256 over the raw capture payload, verified
//!   on every restore
//! - **Reversible transforms**: gzip compression and AES-256-GCM sealing
//!   with key material held by an external key store
//! - **Pluggable destinations**: in-memory, filesystem, and (behind the
//!   `s3` feature) S3 storage gateways
//! - **Per-config retention**: a sweeper that honors each config's own
//!   retention window
//!
//! ## Modules
//!
//! - [`backup`]: orchestrators, run registries, retention, service surface
//! - [`capture`]: per-resource snapshot producers
//! - [`transform`]: checksum, compression, and encryption stages
//! - [`storage`]: storage gateway trait and implementations

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Backup and restore orchestration
pub mod backup;

/// Capture adapters for each resource class
pub mod capture;

/// Storage gateways
pub mod storage;

/// Integrity and transform stages
pub mod transform;
