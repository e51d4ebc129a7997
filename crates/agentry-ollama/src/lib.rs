// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama adapters for Agentry: a chat-completion provider used as the
//! local fallback tier, and the embedding adapter used by knowledge
//! pipelines.

pub mod client;
pub mod embedder;
pub mod provider;
pub mod types;

pub use embedder::OllamaEmbedder;
pub use provider::OllamaProvider;
