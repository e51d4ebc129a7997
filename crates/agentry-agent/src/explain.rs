// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing explanation of completion-time backend failures.

use agentry_core::types::{BackendCandidate, BackendKind};
use agentry_core::AgentryError;

/// Turns a failed completion into reply text listing probable causes.
pub fn explain_backend_error(backend: &BackendCandidate, err: &AgentryError) -> String {
    let text = err.to_string();
    let lower = text.to_lowercase();
    let mut causes = Vec::new();

    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("api key")
    {
        causes.push("the API key is missing, invalid or has been revoked".to_string());
    }
    if lower.contains("429") || lower.contains("rate limit") {
        causes.push("the backend is rate limiting requests; try again shortly".to_string());
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        causes.push("the backend took too long to respond".to_string());
    }
    if lower.contains("connect") || lower.contains("unreachable") || lower.contains("dns") {
        let cause = match &backend.kind {
            BackendKind::Ollama(params) => {
                format!("the Ollama runtime at {} is not running or not reachable", params.host)
            }
            BackendKind::Groq(params) => format!("{} could not be reached", params.base_url),
        };
        causes.push(cause);
    }
    if lower.contains("model") && (lower.contains("not found") || lower.contains("404")) {
        causes.push(format!("the model `{}` is not available on this backend", backend.model_id));
    }
    if causes.is_empty() {
        causes.push("the backend returned an unexpected error".to_string());
    }

    let mut reply = format!(
        "I couldn't get a response from the language model ({}).\n\nError: {text}\n\nPossible causes:\n",
        backend.label()
    );
    for cause in causes {
        reply.push_str("- ");
        reply.push_str(&cause);
        reply.push('\n');
    }
    reply
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agentry_core::types::{GroqParams, OllamaParams, ProviderTier};

    use super::*;

    fn groq() -> BackendCandidate {
        BackendCandidate::new(
            ProviderTier::Primary,
            "llama-3.3-70b-versatile",
            BackendKind::Groq(GroqParams {
                api_key: Some("gsk".into()),
                base_url: "https://api.groq.com/openai/v1".into(),
                timeout: Duration::from_secs(60),
            }),
        )
    }

    #[test]
    fn unauthorized_points_at_the_key() {
        let err = AgentryError::provider("groq", "API returned 401 Unauthorized: invalid_api_key");
        let reply = explain_backend_error(&groq(), &err);
        assert!(reply.contains("groq/llama-3.3-70b-versatile"));
        assert!(reply.contains("API key"));
        assert!(!reply.contains("unexpected error"));
    }

    #[test]
    fn connection_failure_names_the_ollama_host() {
        let ollama = BackendCandidate::new(
            ProviderTier::Fallback,
            "gemma2:2b",
            BackendKind::Ollama(OllamaParams {
                host: "http://localhost:11434".into(),
                timeout: Duration::from_secs(120),
            }),
        );
        let err = AgentryError::provider("ollama", "request to http://localhost:11434/api/chat failed: error sending request: connection refused");
        let reply = explain_backend_error(&ollama, &err);
        assert!(reply.contains("http://localhost:11434 is not running"));
    }

    #[test]
    fn unknown_failures_still_get_a_cause() {
        let err = AgentryError::provider("groq", "API returned 500: oops");
        assert!(explain_backend_error(&groq(), &err).contains("unexpected error"));
    }
}
