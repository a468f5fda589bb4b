// Database capture adapter - read-only schema metadata snapshot

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::CaptureAdapter;

/// Snapshots relational schema metadata through read-only
/// `information_schema` queries. Table data itself is out of scope; the
/// payload describes the shape of the store at capture time.
pub struct DatabaseCaptureAdapter {
    pool: PgPool,
}

impl DatabaseCaptureAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a dedicated pool for capture queries.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL for schema capture")?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CaptureAdapter for DatabaseCaptureAdapter {
    async fn capture(&self) -> Result<Vec<u8>> {
        let tables: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT table_schema, table_name
            FROM information_schema.tables
            WHERE table_schema NOT IN ('pg_catalog', 'information_schema')
            ORDER BY table_schema, table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tables")?;

        let columns: Vec<(String, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT table_schema, table_name, column_name, data_type, is_nullable
            FROM information_schema.columns
            WHERE table_schema NOT IN ('pg_catalog', 'information_schema')
            ORDER BY table_schema, table_name, ordinal_position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list columns")?;

        let table_entries: Vec<_> = tables
            .iter()
            .map(|(schema, name)| {
                let table_columns: Vec<_> = columns
                    .iter()
                    .filter(|(col_schema, col_table, ..)| col_schema == schema && col_table == name)
                    .map(|(_, _, column, data_type, nullable)| {
                        json!({
                            "name": column,
                            "data_type": data_type,
                            "nullable": nullable == "YES",
                        })
                    })
                    .collect();

                json!({
                    "schema": schema,
                    "name": name,
                    "columns": table_columns,
                })
            })
            .collect();

        let payload = json!({
            "resource": "database",
            "captured_at": Utc::now(),
            "tables": table_entries,
        });

        serde_json::to_vec(&payload).context("Failed to serialize schema snapshot")
    }
}
