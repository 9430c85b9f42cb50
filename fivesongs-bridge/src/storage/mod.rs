//! Scoped key/value storage
//!
//! Two independent stores back the bridge: a session scope (in-memory
//! SQLite, gone when the process exits, cleared on phase transitions) and a
//! durable scope (SQLite file, survives restarts). Values are serialized
//! JSON.
//!
//! The public operations never raise: serialization and storage failures
//! degrade to a no-op (writes) or an absent result (reads), logged at warn
//! level. The fallible `try_*` internals keep that swallowing explicit at
//! the boundary.

pub mod game;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::warn;

/// A JSON key/value store over one SQLite pool
#[derive(Clone)]
pub struct KvStore {
    pool: Pool<Sqlite>,
}

impl KvStore {
    /// Open the durable store at `path`, creating file and table if missing
    pub async fn open_durable(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory store (session scope)
    pub async fn open_in_memory() -> Result<Self> {
        // An in-memory SQLite database exists per connection; a single
        // connection keeps every read and write on the same database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Read a value; `None` means absent, unreadable, or malformed
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.try_get_raw(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("storage read failed for '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // Malformed persisted data is treated as absent
                warn!("discarding malformed value for '{}': {}", key, e);
                None
            }
        }
    }

    /// Write a value; failures degrade to a no-op
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value).await {
            warn!("storage write failed for '{}': {}", key, e);
        }
    }

    /// Remove a key; failures degrade to a no-op
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key).await {
            warn!("storage remove failed for '{}': {}", key, e);
        }
    }

    async fn try_set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.try_set_raw(key, &raw).await
    }

    async fn try_get_raw(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn try_set_raw(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn try_remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Close the underlying pool (test hook for simulating storage failure)
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
