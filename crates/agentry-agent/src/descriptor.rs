// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable description of an assembled agent.

use agentry_core::types::{BackendCandidate, HistoryStore};
use serde::Serialize;

/// Table the web agent's conversation history lives in.
pub const WEB_AGENT_TABLE: &str = "web_agent";

/// Prior user/assistant exchanges replayed into every request.
pub const NUM_HISTORY_RESPONSES: usize = 3;

/// Behavioural instructions given to the web agent, in order.
pub const WEB_AGENT_INSTRUCTIONS: [&str; 4] = [
    "Always include sources",
    "If you're not sure about something, say so",
    "Be concise and clear in your responses",
    "If you encounter an error, explain what might have caused it",
];

/// How much prior conversation is replayed, and where it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPolicy {
    num_history_responses: usize,
    store: HistoryStore,
}

impl HistoryPolicy {
    pub fn new(num_history_responses: usize, store: HistoryStore) -> Self {
        Self {
            num_history_responses,
            store,
        }
    }

    pub fn num_history_responses(&self) -> usize {
        self.num_history_responses
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }
}

/// Everything that defines an agent's behaviour. Fields are private: once
/// built, a descriptor cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    name: String,
    backend: BackendCandidate,
    tools: Vec<String>,
    instructions: Vec<String>,
    add_datetime_to_instructions: bool,
    history: Option<HistoryPolicy>,
    markdown: bool,
}

impl AgentDescriptor {
    /// A descriptor with the datetime instruction on, markdown off and no history.
    pub fn new(
        name: impl Into<String>,
        backend: BackendCandidate,
        tools: Vec<String>,
        instructions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            tools,
            instructions,
            add_datetime_to_instructions: true,
            history: None,
            markdown: false,
        }
    }

    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_datetime(mut self, add_datetime: bool) -> Self {
        self.add_datetime_to_instructions = add_datetime;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL-safe identifier derived from the name, e.g. `web-agent`.
    pub fn id(&self) -> String {
        let mut id = String::with_capacity(self.name.len());
        for c in self.name.trim().chars() {
            if c.is_ascii_alphanumeric() {
                id.push(c.to_ascii_lowercase());
            } else if !id.ends_with('-') && !id.is_empty() {
                id.push('-');
            }
        }
        id.trim_end_matches('-').to_string()
    }

    pub fn backend(&self) -> &BackendCandidate {
        &self.backend
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn add_datetime_to_instructions(&self) -> bool {
        self.add_datetime_to_instructions
    }

    pub fn history(&self) -> Option<&HistoryPolicy> {
        self.history.as_ref()
    }

    pub fn markdown(&self) -> bool {
        self.markdown
    }

    /// Serializable view for the playground API. Contains no credentials.
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            agent_id: self.id(),
            name: self.name.clone(),
            model: AgentModel {
                provider: self.backend.kind.provider_name().to_string(),
                model: self.backend.model_id.clone(),
                tier: self.backend.tier.to_string(),
            },
            tools: self.tools.clone(),
            instructions: self.instructions.clone(),
            markdown: self.markdown,
            storage: self.history.is_some(),
            num_history_responses: self
                .history
                .as_ref()
                .map_or(0, HistoryPolicy::num_history_responses),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub agent_id: String,
    pub name: String,
    pub model: AgentModel,
    pub tools: Vec<String>,
    pub instructions: Vec<String>,
    pub markdown: bool,
    pub storage: bool,
    pub num_history_responses: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentModel {
    pub provider: String,
    pub model: String,
    pub tier: String,
}
