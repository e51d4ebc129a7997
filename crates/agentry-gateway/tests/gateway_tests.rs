// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests for the playground API.

use std::sync::Arc;
use std::time::Duration;

use agentry_agent::{Agent, ConversationalAgentBuilder};
use agentry_core::types::{BackendCandidate, BackendKind, GroqParams, OllamaParams, ProviderTier};
use agentry_gateway::{GatewayState, router};
use agentry_test_utils::{MockProvider, ScriptedFactory};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

fn groq() -> BackendCandidate {
    BackendCandidate::new(
        ProviderTier::Primary,
        "llama-3.3-70b-versatile",
        BackendKind::Groq(GroqParams {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".into(),
            timeout: Duration::from_secs(60),
        }),
    )
}

fn ollama() -> BackendCandidate {
    BackendCandidate::new(
        ProviderTier::Fallback,
        "gemma2:2b",
        BackendKind::Ollama(OllamaParams {
            host: "http://localhost:11434".into(),
            timeout: Duration::from_secs(120),
        }),
    )
}

async fn web_agent(dir: &TempDir, provider: Arc<MockProvider>) -> Arc<Agent> {
    let agent = ConversationalAgentBuilder::new()
        .provider_factory(Arc::new(
            ScriptedFactory::new()
                .fail("groq", "GROQ_API_KEY is not set")
                .succeed("ollama", provider),
        ))
        .build(vec![], &groq(), &ollama(), &dir.path().join("agents.db"))
        .await
        .unwrap();
    Arc::new(agent)
}

async fn send(state: &GatewayState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_and_status() {
    let state = GatewayState::new(vec![]);
    let (status, body) = send(&state, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&state, Method::GET, "/v1/playground/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playground"], "available");
}

#[tokio::test]
async fn agents_are_listed_with_their_bound_backend() {
    let dir = TempDir::new().unwrap();
    let state = GatewayState::new(vec![web_agent(&dir, Arc::new(MockProvider::named("ollama"))).await]);

    let (status, body) = send(&state, Method::GET, "/v1/playground/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["agent_id"], "web-agent");
    assert_eq!(body[0]["model"]["provider"], "ollama");
    assert_eq!(body[0]["num_history_responses"], 3);
    assert!(!body.to_string().contains("api_key"));
}

#[tokio::test]
async fn run_then_inspect_and_delete_session() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::named("ollama"));
    provider.push_text("Hello from the web agent.").await;
    let state = GatewayState::new(vec![web_agent(&dir, provider).await]);

    let (status, body) = send(
        &state,
        Method::POST,
        "/v1/playground/agents/web-agent/runs",
        Some(serde_json::json!({"message": "hi", "session_id": "s-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Hello from the web agent.");
    assert_eq!(body["session_id"], "s-1");
    assert!(body.get("backend_error").is_none());

    let (status, body) = send(&state, Method::GET, "/v1/playground/agents/web-agent/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["session_id"], "s-1");
    assert_eq!(body[0]["message_count"], 2);

    let (status, body) = send(&state, Method::GET, "/v1/playground/agents/web-agent/sessions/s-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][1]["role"], "assistant");

    let (status, body) = send(&state, Method::DELETE, "/v1/playground/agents/web-agent/sessions/s-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);

    let (status, _) = send(&state, Method::GET, "/v1/playground/agents/web-agent/sessions/s-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backend_failure_is_explained_in_the_reply() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::named("ollama"));
    provider
        .push_error("request to http://localhost:11434/api/chat failed: connection refused")
        .await;
    let state = GatewayState::new(vec![web_agent(&dir, provider).await]);

    let (status, body) = send(
        &state,
        Method::POST,
        "/v1/playground/agents/web-agent/runs",
        Some(serde_json::json!({"message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_str().unwrap().contains("Possible causes"));
    assert!(body["backend_error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn unknown_agent_and_empty_message_are_rejected() {
    let dir = TempDir::new().unwrap();
    let state = GatewayState::new(vec![web_agent(&dir, Arc::new(MockProvider::named("ollama"))).await]);

    let (status, body) = send(
        &state,
        Method::POST,
        "/v1/playground/agents/nobody/runs",
        Some(serde_json::json!({"message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nobody"));

    let (status, _) = send(
        &state,
        Method::POST,
        "/v1/playground/agents/web-agent/runs",
        Some(serde_json::json!({"message": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
