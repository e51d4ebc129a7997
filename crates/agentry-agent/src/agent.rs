// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assembled agent and its request/tool-call/reply loop.

use std::sync::Arc;

use agentry_core::traits::{HistoryAdapter, ProviderAdapter};
use agentry_core::types::{ChatMessage, ProviderRequest, Role, SessionId, ToolCall};
use agentry_core::AgentryError;
use agentry_tools::{ToolOutput, ToolRegistry};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::descriptor::AgentDescriptor;
use crate::explain::explain_backend_error;
use crate::prompt::system_prompt;

/// Provider round-trips per run. The last round is sent without tools so
/// the model has to answer in text.
pub const MAX_TOOL_ROUNDS: usize = 5;

/// One tool call made while answering.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: serde_json::Value,
    pub output: String,
    pub is_error: bool,
}

/// Result of [`Agent::run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub session_id: String,
    pub content: String,
    pub model: String,
    pub tool_calls: Vec<ToolInvocation>,
    /// Set when the completion backend failed and `content` explains why.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_error: Option<String>,
}

/// An agent bound to one completion backend, its tools and optional history.
pub struct Agent {
    descriptor: AgentDescriptor,
    provider: Arc<dyn ProviderAdapter>,
    tools: ToolRegistry,
    history: Option<Arc<dyn HistoryAdapter>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("descriptor", &self.descriptor)
            .field("provider", &self.provider.name())
            .field("tools", &self.tools)
            .finish()
    }
}

impl Agent {
    pub fn new(
        descriptor: AgentDescriptor,
        provider: Arc<dyn ProviderAdapter>,
        tools: ToolRegistry,
        history: Option<Arc<dyn HistoryAdapter>>,
    ) -> Self {
        Self {
            descriptor,
            provider,
            tools,
            history,
        }
    }

    pub fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> String {
        self.descriptor.id()
    }

    pub fn history(&self) -> Option<&Arc<dyn HistoryAdapter>> {
        self.history.as_ref()
    }

    /// Answers `message` within `session_id`, starting a new session when none is given.
    ///
    /// Storage failures propagate. A failing completion backend does not: the
    /// reply explains the failure and [`RunResponse::backend_error`] is set.
    pub async fn run(
        &self,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<RunResponse, AgentryError> {
        let session_id = match session_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => SessionId::generate().0,
        };

        let mut messages = vec![ChatMessage::system(system_prompt(
            &self.descriptor,
            &chrono::Local::now(),
        ))];
        if let (Some(history), Some(policy)) = (&self.history, self.descriptor.history()) {
            let prior = history
                .recent_exchanges(&session_id, policy.num_history_responses())
                .await?;
            debug!(session_id = %session_id, turns = prior.len(), "loaded history window");
            messages.extend(prior.into_iter().map(|m| match m.role {
                Role::Assistant => ChatMessage::assistant(m.content),
                _ => ChatMessage::user(m.content),
            }));
            history.append(&session_id, Role::User, message).await?;
        }
        messages.push(ChatMessage::user(message));

        let mut invocations = Vec::new();
        let outcome = self.converse(messages, &mut invocations).await;

        let (content, model, backend_error) = match outcome {
            Ok((content, model)) => (content, model, None),
            Err(e) => {
                error!(
                    backend = %self.descriptor.backend().label(),
                    error = %e,
                    "completion failed during run"
                );
                (
                    explain_backend_error(self.descriptor.backend(), &e),
                    self.descriptor.backend().model_id.clone(),
                    Some(e.to_string()),
                )
            }
        };

        if let Some(history) = &self.history {
            history.append(&session_id, Role::Assistant, &content).await?;
        }

        Ok(RunResponse {
            session_id,
            content,
            model,
            tool_calls: invocations,
            backend_error,
        })
    }

    async fn converse(
        &self,
        mut messages: Vec<ChatMessage>,
        invocations: &mut Vec<ToolInvocation>,
    ) -> Result<(String, String), AgentryError> {
        let specs = self.tools.specs();
        for round in 0..MAX_TOOL_ROUNDS {
            let last_round = round + 1 == MAX_TOOL_ROUNDS;
            let request = ProviderRequest {
                model: self.descriptor.backend().model_id.clone(),
                messages: messages.clone(),
                tools: if last_round { Vec::new() } else { specs.clone() },
            };
            let response = self.provider.complete(request).await?;

            if response.tool_calls.is_empty() || last_round {
                return Ok((response.content, response.model));
            }

            messages.push(ChatMessage {
                role: Role::Assistant,
                content: response.content,
                tool_calls: response.tool_calls.clone(),
                tool_call_id: None,
            });
            for call in response.tool_calls {
                let output = self.invoke_tool(&call).await;
                messages.push(ChatMessage::tool_result(&call.id, &output.content));
                invocations.push(ToolInvocation {
                    name: call.name,
                    arguments: call.arguments,
                    output: output.content,
                    is_error: output.is_error,
                });
            }
        }
        Err(AgentryError::Internal("tool loop ended without a reply".into()))
    }

    async fn invoke_tool(&self, call: &ToolCall) -> ToolOutput {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "model requested an unknown tool");
            return ToolOutput::error(format!("unknown tool `{}`", call.name));
        };
        debug!(tool = %call.name, arguments = %call.arguments, "invoking tool");
        match tool.invoke(call.arguments.clone()).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool invocation failed");
                ToolOutput::error(e.to_string())
            }
        }
    }
}
