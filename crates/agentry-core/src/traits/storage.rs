// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History adapter trait for persistent conversation storage.

use async_trait::async_trait;

use crate::error::AgentryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Role, SessionSummary, StoredMessage};

/// Adapter for conversation-history persistence.
///
/// One adapter instance owns one logical table; turns are keyed by session id.
#[async_trait]
pub trait HistoryAdapter: PluginAdapter {
    /// Appends a turn to the session and returns its row id.
    async fn append(&self, session_id: &str, role: Role, content: &str)
        -> Result<i64, AgentryError>;

    /// Returns the last `exchanges` user/assistant pairs of the session, oldest first.
    async fn recent_exchanges(
        &self,
        session_id: &str,
        exchanges: usize,
    ) -> Result<Vec<StoredMessage>, AgentryError>;

    /// Returns every turn of the session, oldest first.
    async fn session_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, AgentryError>;

    /// Lists sessions, most recently active first.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AgentryError>;

    /// Deletes all turns of a session and returns how many were removed.
    async fn delete_session(&self, session_id: &str) -> Result<usize, AgentryError>;
}
