// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management: directory creation, PRAGMA setup and
//! per-agent table creation.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use agentry_core::AgentryError;
use tracing::debug;

/// Convert a tokio-rusqlite error into `AgentryError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AgentryError {
    AgentryError::Storage {
        source: Box::new(e),
    }
}

/// Returns true if `name` can be spliced into SQL as a table identifier.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 64 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An open SQLite database file.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl Database {
    /// Open (creating if needed) the database file at `path`.
    ///
    /// Missing parent directories are created. Every failure is reported as
    /// [`AgentryError::StorageInit`].
    pub async fn open(path: &Path) -> Result<Self, AgentryError> {
        let shown = path.display().to_string();
        let init_err = |source: agentry_core::error::BoxError| AgentryError::StorageInit {
            path: shown.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| init_err(Box::new(e)))?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| init_err(Box::new(e)))?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(|e| init_err(Box::new(e)))?;

        debug!(path = %shown, "history database opened");
        Ok(Self {
            conn,
            path: shown,
        })
    }

    /// Create the history table `table` and its session index if absent.
    pub async fn ensure_history_table(&self, table: &str) -> Result<(), AgentryError> {
        if !is_valid_table_name(table) {
            return Err(AgentryError::StorageInit {
                path: self.path.clone(),
                source: format!("invalid table name `{table}`").into(),
            });
        }
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 session_id TEXT NOT NULL,
                 role TEXT NOT NULL,
                 content TEXT NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_{table}_session ON {table} (session_id, id);"
        );
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&ddl)?;
                Ok(())
            })
            .await
            .map_err(|e| AgentryError::StorageInit {
                path: self.path.clone(),
                source: Box::new(e),
            })
    }

    /// The shared connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checkpoint the WAL so the main file holds every committed turn.
    pub async fn checkpoint(&self) -> Result<(), AgentryError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_validation() {
        assert!(is_valid_table_name("web_agent"));
        assert!(is_valid_table_name("_private2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("web-agent"));
        assert!(!is_valid_table_name("x; DROP TABLE y"));
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/agents.db");
        let db = Database::open(&path).await.unwrap();
        db.ensure_history_table("web_agent").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn invalid_table_name_is_storage_init_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("a.db")).await.unwrap();
        let err = db.ensure_history_table("bad name").await.unwrap_err();
        assert!(matches!(err, AgentryError::StorageInit { .. }));
    }

    #[tokio::test]
    async fn open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let err = Database::open(&blocker.join("agents.db")).await.err().unwrap();
        assert!(matches!(err, AgentryError::StorageInit { .. }));
    }
}
