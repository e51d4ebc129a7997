// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`HistoryAdapter`] trait.

use std::str::FromStr;

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use agentry_core::types::{HistoryStore, Role, SessionSummary, StoredMessage};
use agentry_core::{AdapterType, AgentryError, HealthStatus, HistoryAdapter, PluginAdapter};

use crate::database::{Database, map_tr_err};

/// Conversation history persisted in one table of a SQLite file.
pub struct SqliteHistory {
    db: Database,
    table: String,
}

impl SqliteHistory {
    /// Opens the database at `store.path` and creates `store.table` if absent.
    ///
    /// This is the only place a history handle touches the filesystem; any
    /// failure is an [`AgentryError::StorageInit`].
    pub async fn open(store: &HistoryStore) -> Result<Self, AgentryError> {
        let db = Database::open(&store.path).await?;
        db.ensure_history_table(&store.table).await?;
        debug!(path = %db.path(), table = %store.table, "history store ready");
        Ok(Self {
            db,
            table: store.table.clone(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Flush the WAL into the main database file.
    pub async fn close(&self) -> Result<(), AgentryError> {
        self.db.checkpoint().await?;
        debug!(table = %self.table, "history WAL checkpoint complete");
        Ok(())
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<StoredMessage, rusqlite::Error> {
    let role: String = row.get(2)?;
    let role = Role::from_str(&role).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(StoredMessage {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[async_trait]
impl PluginAdapter for SqliteHistory {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl HistoryAdapter for SqliteHistory {
    async fn append(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<i64, AgentryError> {
        let sql = format!(
            "INSERT INTO {} (session_id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            self.table
        );
        let session_id = session_id.to_string();
        let content = content.to_string();
        let role = role.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.execute(&sql, params![session_id, role, content, now_timestamp()])?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn recent_exchanges(
        &self,
        session_id: &str,
        exchanges: usize,
    ) -> Result<Vec<StoredMessage>, AgentryError> {
        if exchanges == 0 {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, session_id, role, content, created_at FROM {}
             WHERE session_id = ?1 AND role IN ('user', 'assistant')
             ORDER BY id DESC LIMIT ?2",
            self.table
        );
        let session_id = session_id.to_string();
        let window = exchanges.saturating_mul(2);
        // One extra row on each side so trimming orphans can still fill the window.
        let limit = i64::try_from(window.saturating_add(2)).unwrap_or(i64::MAX);
        let mut messages = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<StoredMessage>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![session_id, limit], row_to_message)?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        messages.reverse();
        // A user turn whose reply was never stored does not form an exchange.
        if messages.last().is_some_and(|m| m.role == Role::User) {
            messages.pop();
        }
        if messages.len() > window {
            messages.drain(..messages.len() - window);
        }
        // A window must not open on a dangling assistant reply.
        if messages.first().is_some_and(|m| m.role == Role::Assistant) {
            messages.remove(0);
        }
        Ok(messages)
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, AgentryError> {
        let sql = format!(
            "SELECT id, session_id, role, content, created_at FROM {}
             WHERE session_id = ?1 ORDER BY id ASC",
            self.table
        );
        let session_id = session_id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<StoredMessage>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![session_id], row_to_message)?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AgentryError> {
        let sql = format!(
            "SELECT session_id, COUNT(*), MAX(created_at) FROM {}
             GROUP BY session_id ORDER BY MAX(id) DESC",
            self.table
        );
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<SessionSummary>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| {
                    Ok(SessionSummary {
                        session_id: row.get(0)?,
                        message_count: row.get(1)?,
                        last_activity: row.get(2)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete_session(&self, session_id: &str) -> Result<usize, AgentryError> {
        let sql = format!("DELETE FROM {} WHERE session_id = ?1", self.table);
        let session_id = session_id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(&sql, params![session_id])
            })
            .await
            .map_err(map_tr_err)
    }
}
