// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The production [`ProviderFactory`]: one HTTP-backed adapter per backend kind.

use std::sync::Arc;

use agentry_core::traits::{ProviderAdapter, ProviderFactory};
use agentry_core::types::{BackendCandidate, BackendKind};
use agentry_core::AgentryError;
use agentry_groq::GroqProvider;
use agentry_ollama::OllamaProvider;

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpProviderFactory;

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, candidate: &BackendCandidate) -> Result<Arc<dyn ProviderAdapter>, AgentryError> {
        match &candidate.kind {
            BackendKind::Groq(params) => Ok(Arc::new(GroqProvider::new(&candidate.model_id, params)?)),
            BackendKind::Ollama(params) => {
                Ok(Arc::new(OllamaProvider::new(&candidate.model_id, params)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use agentry_core::types::{GroqParams, OllamaParams, ProviderTier};

    #[test]
    fn groq_without_key_fails_and_ollama_succeeds() {
        let factory = HttpProviderFactory;
        let groq = BackendCandidate::new(
            ProviderTier::Primary,
            "llama-3.3-70b-versatile",
            BackendKind::Groq(GroqParams {
                api_key: None,
                base_url: "https://api.groq.com/openai/v1".into(),
                timeout: Duration::from_secs(60),
            }),
        );
        let ollama = BackendCandidate::new(
            ProviderTier::Fallback,
            "gemma2:2b",
            BackendKind::Ollama(OllamaParams {
                host: "http://localhost:11434".into(),
                timeout: Duration::from_secs(120),
            }),
        );
        assert!(factory.create(&groq).err().unwrap().is_backend_failure());
        assert_eq!(factory.create(&ollama).unwrap().name(), "ollama");
    }
}
