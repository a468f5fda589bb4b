// File capture adapter - allow-listed configuration files

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{json, Map};
use tokio::fs;
use tracing::warn;

use super::CaptureAdapter;

/// Reads a fixed allow-list of configuration file paths into a manifest.
/// Missing files are skipped with a warning; any other read error aborts
/// the capture.
pub struct FileCaptureAdapter {
    paths: Vec<PathBuf>,
}

impl FileCaptureAdapter {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl CaptureAdapter for FileCaptureAdapter {
    async fn capture(&self) -> Result<Vec<u8>> {
        let mut files = Map::new();
        let mut skipped: Vec<String> = Vec::new();

        for path in &self.paths {
            match fs::read(path).await {
                Ok(bytes) => {
                    files.insert(path.display().to_string(), json!(BASE64.encode(&bytes)));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(path = %path.display(), "config file missing, skipped");
                    skipped.push(path.display().to_string());
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read config file {}", path.display()));
                }
            }
        }

        let payload = json!({
            "resource": "files",
            "captured_at": Utc::now(),
            "files": files,
            "skipped": skipped,
        });

        serde_json::to_vec(&payload).context("Failed to serialize file manifest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("storevault-files-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn captures_present_files_and_skips_missing() {
        let dir = scratch_dir().await;
        let present = dir.join("app.toml");
        let missing = dir.join("does-not-exist.toml");
        fs::write(&present, b"port = 8080").await.unwrap();

        let adapter = FileCaptureAdapter::new(vec![present.clone(), missing.clone()]);
        let payload = adapter.capture().await.unwrap();

        let manifest: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        let files = manifest["files"].as_object().unwrap();
        assert_eq!(files.len(), 1);

        let encoded = files[&present.display().to_string()].as_str().unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"port = 8080");

        let skipped = manifest["skipped"].as_array().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0], missing.display().to_string());
    }

    #[tokio::test]
    async fn empty_allow_list_yields_empty_manifest() {
        let adapter = FileCaptureAdapter::new(Vec::new());
        let payload = adapter.capture().await.unwrap();

        let manifest: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert!(manifest["files"].as_object().unwrap().is_empty());
    }
}
