// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq provider adapter for Agentry.
//!
//! Implements [`ProviderAdapter`] against Groq's OpenAI-compatible
//! `/chat/completions` endpoint, including function-style tool calls.

pub mod client;
pub mod types;

use async_trait::async_trait;
use agentry_core::error::AgentryError;
use agentry_core::traits::{PluginAdapter, ProviderAdapter};
use agentry_core::types::{
    AdapterType, ChatMessage, GroqParams, HealthStatus, ProviderRequest, ProviderResponse, Role,
    TokenUsage, ToolCall,
};
use tracing::{debug, info, warn};

use crate::client::GroqClient;
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, WireFunction, WireFunctionCall, WireMessage,
    WireTool, WireToolCall,
};

/// Groq chat-completion provider.
pub struct GroqProvider {
    client: GroqClient,
    model: String,
}

impl GroqProvider {
    /// Constructs the provider. Performs no network I/O.
    ///
    /// Fails with [`AgentryError::Provider`] when no API key is available or
    /// the base URL is not an HTTP(S) URL.
    pub fn new(model: &str, params: &GroqParams) -> Result<Self, AgentryError> {
        let api_key = params
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentryError::provider("groq", "GROQ_API_KEY is not set"))?;

        if !(params.base_url.starts_with("http://") || params.base_url.starts_with("https://")) {
            return Err(AgentryError::provider(
                "groq",
                format!("invalid base URL `{}`", params.base_url),
            ));
        }

        let client = GroqClient::new(api_key, &params.base_url, params.timeout)?;
        info!(model, "Groq provider initialized");
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_wire_request(&self, request: &ProviderRequest) -> ChatCompletionRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };
        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|t| WireTool {
                    type_: "function",
                    function: WireFunction {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    },
                })
                .collect()
        });

        ChatCompletionRequest {
            model,
            messages: request.messages.iter().map(to_wire_message).collect(),
            tools,
            stream: false,
        }
    }
}

fn to_wire_message(message: &ChatMessage) -> WireMessage {
    let tool_calls = (!message.tool_calls.is_empty()).then(|| {
        message
            .tool_calls
            .iter()
            .map(|c| WireToolCall {
                id: c.id.clone(),
                type_: "function".to_string(),
                function: WireFunctionCall {
                    name: c.name.clone(),
                    arguments: c.arguments.to_string(),
                },
            })
            .collect()
    });
    let content = if message.role == Role::Assistant && message.content.is_empty() && tool_calls.is_some() {
        None
    } else {
        Some(message.content.clone())
    };
    WireMessage {
        role: message.role.to_string(),
        content,
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn from_wire_response(response: ChatCompletionResponse) -> Result<ProviderResponse, AgentryError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentryError::provider("groq", "response contained no choices"))?;
    debug!(finish_reason = ?choice.finish_reason, "groq choice received");

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|c| {
            let arguments = serde_json::from_str(&c.function.arguments).unwrap_or_else(|e| {
                warn!(tool = %c.function.name, error = %e, "tool arguments are not valid JSON");
                serde_json::Value::String(c.function.arguments.clone())
            });
            ToolCall {
                id: c.id,
                name: c.function.name,
                arguments,
            }
        })
        .collect();

    Ok(ProviderResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        model: response.model,
        usage: response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

#[async_trait]
impl PluginAdapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for GroqProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AgentryError> {
        let wire = self.to_wire_request(&request);
        let response = self.client.complete(&wire).await?;
        from_wire_response(response)
    }
}
