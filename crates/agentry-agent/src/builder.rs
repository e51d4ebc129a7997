// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of the web-search conversational agent.

use std::path::Path;
use std::sync::Arc;

use agentry_core::traits::{HistoryAdapter, ProviderFactory};
use agentry_core::types::{BackendCandidate, HistoryStore};
use agentry_core::AgentryError;
use agentry_storage::SqliteHistory;
use agentry_tools::{Tool, ToolRegistry};
use tracing::info;

use crate::agent::Agent;
use crate::descriptor::{
    AgentDescriptor, HistoryPolicy, NUM_HISTORY_RESPONSES, WEB_AGENT_INSTRUCTIONS, WEB_AGENT_TABLE,
};
use crate::factory::HttpProviderFactory;
use crate::fallback::with_fallback;

/// Builds an [`Agent`] with a fixed instruction and history policy.
pub struct ConversationalAgentBuilder {
    name: String,
    markdown: bool,
    factory: Arc<dyn ProviderFactory>,
}

impl Default for ConversationalAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationalAgentBuilder {
    pub fn new() -> Self {
        Self {
            name: "Web Agent".to_string(),
            markdown: true,
            factory: Arc::new(HttpProviderFactory),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Replaces the factory used to construct completion backends.
    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Selects a backend (primary, then fallback once), opens the history
    /// table `web_agent` at `storage_path` and assembles the agent.
    ///
    /// Backend selection happens first, so a failed selection leaves no
    /// database file behind.
    pub async fn build(
        &self,
        toolset: Vec<Arc<dyn Tool>>,
        primary: &BackendCandidate,
        fallback: &BackendCandidate,
        storage_path: &Path,
    ) -> Result<Agent, AgentryError> {
        let (backend, provider) =
            with_fallback(primary, fallback, |candidate| self.factory.create(candidate))?;

        let store = HistoryStore {
            path: storage_path.to_path_buf(),
            table: WEB_AGENT_TABLE.to_string(),
        };
        let history: Arc<dyn HistoryAdapter> = Arc::new(SqliteHistory::open(&store).await?);

        let tools = ToolRegistry::from_tools(toolset);
        let descriptor = AgentDescriptor::new(
            self.name.clone(),
            backend,
            tools.names().into_iter().map(str::to_string).collect(),
            WEB_AGENT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
        )
        .with_history(HistoryPolicy::new(NUM_HISTORY_RESPONSES, store))
        .with_markdown(self.markdown);

        info!(
            agent = %descriptor.name(),
            backend = %descriptor.backend().label(),
            tools = ?descriptor.tools(),
            "agent assembled"
        );

        Ok(Agent::new(descriptor, provider, tools, Some(history)))
    }
}
