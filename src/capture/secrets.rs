// Secrets capture adapter - redacted manifest of secret-bearing env vars
//
// Never captures values. The manifest records a redaction marker for each
// variable that is set and null for each that is not, so a restore operator
// can see which secrets existed without the backup ever holding one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};

use super::CaptureAdapter;

const REDACTION_MARKER: &str = "[REDACTED]";

/// Captures presence/absence of a known list of secret-bearing environment
/// variables.
pub struct SecretsCaptureAdapter {
    var_names: Vec<String>,
}

impl SecretsCaptureAdapter {
    pub fn new(var_names: Vec<String>) -> Self {
        Self { var_names }
    }
}

#[async_trait]
impl CaptureAdapter for SecretsCaptureAdapter {
    async fn capture(&self) -> Result<Vec<u8>> {
        let mut entries = Map::new();
        for name in &self.var_names {
            let marker = if std::env::var(name).is_ok() {
                json!(REDACTION_MARKER)
            } else {
                Value::Null
            };
            entries.insert(name.clone(), marker);
        }

        let payload = json!({
            "resource": "secrets",
            "captured_at": Utc::now(),
            "secrets": entries,
        });

        serde_json::to_vec(&payload).context("Failed to serialize secret manifest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_presence_without_values() {
        std::env::set_var("STOREVAULT_TEST_SECRET", "super-secret-value");

        let adapter = SecretsCaptureAdapter::new(vec![
            "STOREVAULT_TEST_SECRET".to_string(),
            "STOREVAULT_TEST_ABSENT".to_string(),
        ]);
        let payload = adapter.capture().await.unwrap();
        let text = String::from_utf8(payload.clone()).unwrap();

        assert!(!text.contains("super-secret-value"));

        let manifest: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(manifest["secrets"]["STOREVAULT_TEST_SECRET"], REDACTION_MARKER);
        assert_eq!(manifest["secrets"]["STOREVAULT_TEST_ABSENT"], Value::Null);
    }
}
