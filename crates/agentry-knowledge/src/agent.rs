// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A completion backend bound to a retrieval pipeline.

use std::fmt::Write;
use std::sync::Arc;

use agentry_core::traits::ProviderAdapter;
use agentry_core::types::{BackendCandidate, ChatMessage, ProviderRequest, SearchHit};
use agentry_core::AgentryError;
use serde::Serialize;
use tracing::{debug, error};

use crate::pipeline::{EmbeddingSample, KnowledgeRetrievalPipeline, LoadReport};

const SYSTEM_PROMPT: &str = "You answer questions using the knowledge base references provided \
with each question. Prefer the references over prior knowledge, and say so when they do not \
contain the answer.";

/// An answer and the chunks it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeAnswer {
    pub content: String,
    pub model: String,
    pub references: Vec<SearchHit>,
}

pub struct KnowledgeAgent {
    pipeline: KnowledgeRetrievalPipeline,
    provider: Arc<dyn ProviderAdapter>,
    backend: BackendCandidate,
}

impl KnowledgeAgent {
    pub fn new(
        pipeline: KnowledgeRetrievalPipeline,
        provider: Arc<dyn ProviderAdapter>,
        backend: BackendCandidate,
    ) -> Self {
        Self {
            pipeline,
            provider,
            backend,
        }
    }

    pub fn pipeline(&self) -> &KnowledgeRetrievalPipeline {
        &self.pipeline
    }

    /// The completion backend chosen at build time.
    pub fn backend(&self) -> &BackendCandidate {
        &self.backend
    }

    pub async fn embed_sample(&self, text: &str) -> Result<EmbeddingSample, AgentryError> {
        self.pipeline.embed_sample(text).await
    }

    pub async fn load_documents(&self, recreate: bool) -> Result<LoadReport, AgentryError> {
        self.pipeline.load(recreate).await
    }

    /// Retrieves the closest chunks for `prompt` and asks the backend to answer from them.
    pub async fn query(&self, prompt: &str, markdown: bool) -> Result<KnowledgeAnswer, AgentryError> {
        let references = self.pipeline.search(prompt).await.map_err(|e| {
            error!(stage = "retrieve", error = %e, "knowledge query failed");
            AgentryError::Query {
                message: format!("retrieval failed: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        debug!(references = references.len(), "references retrieved");

        let mut system = SYSTEM_PROMPT.to_string();
        if markdown {
            system.push_str(" Use markdown to format your answers.");
        }
        let request = ProviderRequest {
            model: self.backend.model_id.clone(),
            messages: vec![
                ChatMessage::system(system),
                ChatMessage::user(grounded_prompt(prompt, &references)),
            ],
            tools: Vec::new(),
        };

        let response = self.provider.complete(request).await.map_err(|e| {
            error!(stage = "complete", backend = %self.backend.label(), error = %e, "knowledge query failed");
            AgentryError::Query {
                message: format!("completion failed: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        Ok(KnowledgeAnswer {
            content: response.content,
            model: response.model,
            references,
        })
    }
}

/// The user message: the question followed by the retrieved references.
pub fn grounded_prompt(prompt: &str, references: &[SearchHit]) -> String {
    let mut text = prompt.to_string();
    if references.is_empty() {
        return text;
    }
    text.push_str("\n\nUse the following references from the knowledge base if they help:\n<references>\n");
    for (i, hit) in references.iter().enumerate() {
        let _ = writeln!(text, "[{}] {}\n{}\n", i + 1, hit.name, hit.content.trim());
    }
    text.push_str("</references>");
    text
}
