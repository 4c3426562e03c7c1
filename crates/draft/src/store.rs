//! SQLite-backed draft slots.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use fretdesk_core::OrdreId;
use fretdesk_orders::OrdreDraft;

/// Addresses one draft slot. One key per wizard type, so a new-order draft
/// never collides with an edit draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey(String);

impl DraftKey {
    pub fn new(slot: impl Into<String>) -> Self {
        Self(slot.into())
    }

    /// The create-flow slot.
    pub fn ordre_nouveau() -> Self {
        Self::new("ordre-nouveau")
    }

    /// The edit-flow slot for one committed order.
    pub fn ordre_edition(id: OrdreId) -> Self {
        Self::new(format!("ordre-edition-{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DraftKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// SQLite-backed local store for draft documents.
///
/// The pool is initialized lazily on first use; cloning the handle is cheap
/// and all clones share one pool.
#[derive(Debug, Clone)]
pub struct DraftStore {
    db_url: String,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl DraftStore {
    /// Store backed by the per-user data directory
    /// (`{app_data_dir}/fretdesk/drafts.db`).
    pub fn open_default() -> anyhow::Result<Self> {
        let path = default_db_path()?;
        Ok(Self::with_url(format!(
            "sqlite://{}?mode=rwc",
            path.to_string_lossy()
        )))
    }

    /// Store backed by an explicit database URL (tests use
    /// `sqlite::memory:`).
    pub fn with_url(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        // One connection: the slot has a single writer (the owning wizard),
        // and an in-memory database must not be split across connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&self.db_url)
            .await
            .with_context(|| format!("failed to open draft store at {}", self.db_url))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drafts (
                slot     TEXT NOT NULL PRIMARY KEY,
                data     TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create drafts table")?;

        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Persist the snapshot under `key` (last write wins).
    pub async fn save(&self, key: &DraftKey, draft: &OrdreDraft) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        let payload =
            serde_json::to_string(draft).context("failed to serialize draft snapshot")?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO drafts (slot, data, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot)
            DO UPDATE SET data = excluded.data, saved_at = excluded.saved_at
            "#,
        )
        .bind(key.as_str())
        .bind(&payload)
        .bind(&now)
        .execute(&pool)
        .await
        .context("failed to upsert draft")?;

        tracing::debug!(slot = key.as_str(), "draft saved");
        Ok(())
    }

    /// Load the snapshot under `key`, if any.
    ///
    /// A malformed or foreign-shaped payload is a recoverable condition: it
    /// is logged and reported as "no draft", never an error.
    pub async fn restore(&self, key: &DraftKey) -> anyhow::Result<Option<OrdreDraft>> {
        let pool = self.get_pool().await?;

        let row = sqlx::query("SELECT data FROM drafts WHERE slot = ?1")
            .bind(key.as_str())
            .fetch_optional(&pool)
            .await
            .context("failed to fetch draft")?;

        let Some(row) = row else {
            return Ok(None);
        };
        let data: String = row.try_get("data")?;

        match serde_json::from_str(&data) {
            Ok(draft) => Ok(Some(draft)),
            Err(err) => {
                tracing::warn!(
                    slot = key.as_str(),
                    "discarding corrupt draft payload: {err}"
                );
                Ok(None)
            }
        }
    }

    /// Remove the slot. Called on successful submission and on explicit
    /// discard; a stale draft must never resurface after creation.
    pub async fn clear(&self, key: &DraftKey) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;

        sqlx::query("DELETE FROM drafts WHERE slot = ?1")
            .bind(key.as_str())
            .execute(&pool)
            .await
            .context("failed to clear draft")?;

        tracing::debug!(slot = key.as_str(), "draft cleared");
        Ok(())
    }
}

/// Resolve `{app_data_dir}/fretdesk/drafts.db`, creating the directory.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory")?;

    let mut dir = base;
    dir.push("fretdesk");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create draft directory at {dir:?}"))?;

    dir.push("drafts.db");
    Ok(dir)
}
