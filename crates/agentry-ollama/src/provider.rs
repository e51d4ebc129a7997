// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama chat provider implementing [`ProviderAdapter`].

use async_trait::async_trait;
use agentry_core::error::AgentryError;
use agentry_core::traits::{PluginAdapter, ProviderAdapter};
use agentry_core::types::{
    AdapterType, ChatMessage, HealthStatus, OllamaParams, ProviderRequest, ProviderResponse,
    TokenUsage, ToolCall,
};
use tracing::info;

use crate::client::{CallError, OllamaClient, normalize_host};
use crate::types::{
    ChatRequest, ChatResponse, OllamaFunction, OllamaFunctionCall, OllamaMessage, OllamaTool,
    OllamaToolCall,
};

fn provider_err(err: CallError) -> AgentryError {
    AgentryError::Provider {
        backend: "ollama".to_string(),
        message: err.message,
        source: err.source.map(|e| Box::new(e) as agentry_core::error::BoxError),
    }
}

/// Chat provider backed by a local Ollama runtime.
pub struct OllamaProvider {
    client: OllamaClient,
    model: String,
}

impl OllamaProvider {
    /// Constructs the provider. Performs no network I/O; only the host URL is validated.
    pub fn new(model: &str, params: &OllamaParams) -> Result<Self, AgentryError> {
        let host = normalize_host(&params.host).map_err(|m| AgentryError::provider("ollama", m))?;
        let client = OllamaClient::new(host, params.timeout).map_err(|e| AgentryError::Provider {
            backend: "ollama".to_string(),
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;
        info!(model, host = %client.host(), "Ollama provider initialized");
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_chat_request(&self, request: &ProviderRequest) -> ChatRequest {
        ChatRequest {
            model: if request.model.is_empty() {
                self.model.clone()
            } else {
                request.model.clone()
            },
            messages: request.messages.iter().map(to_ollama_message).collect(),
            tools: request
                .tools
                .iter()
                .map(|t| OllamaTool {
                    type_: "function",
                    function: OllamaFunction {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    },
                })
                .collect(),
            stream: false,
        }
    }
}

fn to_ollama_message(message: &ChatMessage) -> OllamaMessage {
    OllamaMessage {
        role: message.role.to_string(),
        content: message.content.clone(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|c| OllamaToolCall {
                function: OllamaFunctionCall {
                    name: c.name.clone(),
                    arguments: c.arguments.clone(),
                },
            })
            .collect(),
    }
}

/// Ollama does not assign call ids, so each call gets a fresh one.
fn from_chat_response(response: ChatResponse) -> ProviderResponse {
    let tool_calls = response
        .message
        .tool_calls
        .into_iter()
        .map(|c| ToolCall {
            id: format!("call_{}", uuid::Uuid::new_v4().simple()),
            name: c.function.name,
            arguments: c.function.arguments,
        })
        .collect();
    let usage = match (response.prompt_eval_count, response.eval_count) {
        (None, None) => None,
        (input, output) => Some(TokenUsage {
            input_tokens: input.unwrap_or(0),
            output_tokens: output.unwrap_or(0),
        }),
    };
    ProviderResponse {
        content: response.message.content,
        tool_calls,
        model: response.model,
        usage,
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AgentryError> {
        match self.client.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OllamaProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AgentryError> {
        let body = self.to_chat_request(&request);
        let response: ChatResponse = self
            .client
            .post_json("/api/chat", &body)
            .await
            .map_err(provider_err)?;
        Ok(from_chat_response(response))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use agentry_core::types::ToolSpec;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(host: &str) -> OllamaParams {
        OllamaParams {
            host: host.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn invalid_host_fails_construction() {
        let err = OllamaProvider::new("gemma2:2b", &params("not a url")).err().unwrap();
        assert!(err.is_backend_failure());
        assert!(err.to_string().contains("ollama"));
    }

    #[test]
    fn construction_does_not_contact_host() {
        // Nothing listens on port 9; construction must still succeed.
        assert!(OllamaProvider::new("gemma2:2b", &params("http://127.0.0.1:9")).is_ok());
    }

    #[tokio::test]
    async fn complete_posts_non_streaming_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "gemma2:2b",
                "stream": false,
                "messages": [{"role": "system", "content": "be brief"}, {"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gemma2:2b",
                "message": {"role": "assistant", "content": "Hello!"},
                "done": true,
                "prompt_eval_count": 12,
                "eval_count": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OllamaProvider::new("gemma2:2b", &params(&format!("{}/", server.uri()))).unwrap();
        let response = provider
            .complete(ProviderRequest {
                model: "gemma2:2b".into(),
                messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
                tools: vec![],
            })
            .await
            .unwrap();
        assert_eq!(response.content, "Hello!");
        assert_eq!(response.usage.unwrap().input_tokens, 12);
    }

    #[tokio::test]
    async fn tool_calls_receive_generated_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gemma2:2b",
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{"function": {"name": "duckduckgo_search", "arguments": {"query": "tokio"}}}]
                },
                "done": true
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new("gemma2:2b", &params(&server.uri())).unwrap();
        let response = provider
            .complete(ProviderRequest {
                model: String::new(),
                messages: vec![ChatMessage::user("search tokio")],
                tools: vec![ToolSpec {
                    name: "duckduckgo_search".into(),
                    description: "search".into(),
                    parameters: serde_json::json!({"type": "object"}),
                }],
            })
            .await
            .unwrap();
        assert_eq!(response.tool_calls.len(), 1);
        assert!(response.tool_calls[0].id.starts_with("call_"));
        assert_eq!(response.tool_calls[0].arguments["query"], "tokio");
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn model_not_found_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "model \"gemma2:2b\" not found"})),
            )
            .mount(&server)
            .await;

        let provider = OllamaProvider::new("gemma2:2b", &params(&server.uri())).unwrap();
        let err = provider
            .complete(ProviderRequest {
                model: String::new(),
                messages: vec![ChatMessage::user("hi")],
                tools: vec![],
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}
