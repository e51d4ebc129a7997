// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider and provider factory for deterministic testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;

use agentry_core::traits::{PluginAdapter, ProviderAdapter, ProviderFactory};
use agentry_core::types::{
    AdapterType, BackendCandidate, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
    ToolCall,
};
use agentry_core::AgentryError;

enum Scripted {
    Reply(ProviderResponse),
    Fail(String),
}

/// A provider that replays a queue of scripted replies.
///
/// When the queue is empty, a default "mock response" text is returned.
/// Every request is recorded for later inspection.
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::named("mock-provider")
    }

    /// A mock whose `name()` is `name` (e.g. `groq`, to stand in for a real backend).
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A mock pre-loaded with plain text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            script: Mutex::new(
                responses
                    .into_iter()
                    .map(|t| Scripted::Reply(text_reply(&t)))
                    .collect(),
            ),
            ..Self::new()
        }
    }

    pub async fn push_text(&self, text: &str) {
        self.script.lock().await.push_back(Scripted::Reply(text_reply(text)));
    }

    /// Queues a reply asking for one tool call.
    pub async fn push_tool_call(&self, name: &str, arguments: serde_json::Value) {
        let reply = ProviderResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: format!("call_{}", uuid::Uuid::new_v4().simple()),
                name: name.to_string(),
                arguments,
            }],
            model: "mock-model".to_string(),
            usage: None,
        };
        self.script.lock().await.push_back(Scripted::Reply(reply));
    }

    /// Queues a completion-time failure.
    pub async fn push_error(&self, message: &str) {
        self.script.lock().await.push_back(Scripted::Fail(message.to_string()));
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn text_reply(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.to_string(),
        tool_calls: Vec::new(),
        model: "mock-model".to_string(),
        usage: Some(TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        }),
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
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
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AgentryError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        match self.script.lock().await.pop_front() {
            Some(Scripted::Reply(mut reply)) => {
                if !model.is_empty() {
                    reply.model = model;
                }
                Ok(reply)
            }
            Some(Scripted::Fail(message)) => Err(AgentryError::provider(self.name.clone(), message)),
            None => Ok(text_reply("mock response")),
        }
    }
}

/// A [`ProviderFactory`] whose outcome per provider name is scripted.
///
/// Providers not scripted either way fail construction.
#[derive(Default)]
pub struct ScriptedFactory {
    providers: HashMap<String, Arc<MockProvider>>,
    failures: HashMap<String, String>,
    attempts: StdMutex<Vec<String>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructing a candidate of provider `name` yields `provider`.
    pub fn succeed(mut self, name: &str, provider: Arc<MockProvider>) -> Self {
        self.failures.remove(name);
        self.providers.insert(name.to_string(), provider);
        self
    }

    /// Constructing a candidate of provider `name` fails with `message`.
    pub fn fail(mut self, name: &str, message: &str) -> Self {
        self.providers.remove(name);
        self.failures.insert(name.to_string(), message.to_string());
        self
    }

    /// Candidate labels in the order construction was attempted.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl ProviderFactory for ScriptedFactory {
    fn create(&self, candidate: &BackendCandidate) -> Result<Arc<dyn ProviderAdapter>, AgentryError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(candidate.label());
        }
        let name = candidate.kind.provider_name();
        if let Some(provider) = self.providers.get(name) {
            return Ok(provider.clone() as Arc<dyn ProviderAdapter>);
        }
        let message = self
            .failures
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("{name} is not scripted"));
        Err(AgentryError::provider(name, message))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use agentry_core::types::{BackendKind, ChatMessage, OllamaParams, ProviderTier};

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::user("hi")],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(provider.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        provider.push_error("boom").await;
        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        assert!(provider.complete(request()).await.is_err());
    }

    #[test]
    fn factory_records_attempts() {
        let factory = ScriptedFactory::new().fail("ollama", "bad host");
        let candidate = BackendCandidate::new(
            ProviderTier::Fallback,
            "gemma2:2b",
            BackendKind::Ollama(OllamaParams {
                host: "x".into(),
                timeout: Duration::from_secs(1),
            }),
        );
        let err = factory.create(&candidate).err().unwrap();
        assert!(err.to_string().contains("bad host"));
        assert_eq!(factory.attempts(), ["ollama/gemma2:2b"]);
    }
}
