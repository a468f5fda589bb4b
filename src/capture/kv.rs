// Key-value capture adapter - full dump of the external KV store

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::{json, Map, Value};
use tracing::warn;

use super::CaptureAdapter;

/// Enumerates every key matching the pattern and captures its type and
/// value. String, hash, list, set, and sorted-set values are dumped with
/// their native shape; anything else is recorded as unreadable.
pub struct KvCaptureAdapter {
    conn: ConnectionManager,
    key_pattern: String,
}

impl KvCaptureAdapter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            key_pattern: "*".to_string(),
        }
    }

    /// Restrict the dump to keys matching a glob pattern.
    pub fn with_key_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.key_pattern = pattern.into();
        self
    }

    /// Connect a dedicated connection for capture reads.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("Failed to create Redis client")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to create Redis connection manager")?;
        Ok(Self::new(conn))
    }

    async fn dump_value(conn: &mut ConnectionManager, key: &str, kind: &str) -> Result<Value> {
        let value = match kind {
            "string" => {
                let v: String = conn.get(key).await.context("GET failed")?;
                json!(v)
            }
            "hash" => {
                let v: HashMap<String, String> = conn.hgetall(key).await.context("HGETALL failed")?;
                json!(v)
            }
            "list" => {
                let v: Vec<String> = conn.lrange(key, 0, -1).await.context("LRANGE failed")?;
                json!(v)
            }
            "set" => {
                let v: Vec<String> = conn.smembers(key).await.context("SMEMBERS failed")?;
                json!(v)
            }
            "zset" => {
                let v: Vec<(String, f64)> = conn
                    .zrange_withscores(key, 0, -1)
                    .await
                    .context("ZRANGE failed")?;
                let scored: Vec<Value> =
                    v.into_iter().map(|(m, s)| json!({"member": m, "score": s})).collect();
                json!(scored)
            }
            other => {
                warn!(key = %key, kind = %other, "unsupported value type, recording as unreadable");
                Value::Null
            }
        };
        Ok(value)
    }
}

#[async_trait]
impl CaptureAdapter for KvCaptureAdapter {
    async fn capture(&self) -> Result<Vec<u8>> {
        let mut conn = self.conn.clone();

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn
                .scan_match::<_, String>(&self.key_pattern)
                .await
                .context("SCAN failed")?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }
        keys.sort();

        let mut entries = Map::new();
        for key in keys {
            let kind: String = redis::cmd("TYPE")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .context("TYPE failed")?;
            let value = Self::dump_value(&mut conn, &key, &kind).await?;
            entries.insert(key, json!({ "type": kind, "value": value }));
        }

        let payload = json!({
            "resource": "kv-store",
            "captured_at": Utc::now(),
            "keys": entries,
        });

        serde_json::to_vec(&payload).context("Failed to serialize KV snapshot")
    }
}
