// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Agentry integration tests.
//!
//! Provides mock adapters so agent and knowledge flows can be exercised
//! without Groq, Ollama, Qdrant, MongoDB or the network.
//!
//! # Components
//!
//! - [`MockProvider`] - provider with a scripted reply queue that records requests
//! - [`ScriptedFactory`] - provider factory whose per-backend outcome is fixed in advance
//! - [`MockEmbedder`] - deterministic bag-of-words embedder
//! - [`MemoryVectorStore`] - in-process vector store with cosine search
//! - [`StaticReader`] - document reader serving canned documents per URL
//! - [`RecordingTool`] - tool that records its invocations

pub mod mock_embedder;
pub mod mock_provider;
pub mod mock_reader;
pub mod mock_store;
pub mod mock_tool;

pub use mock_embedder::MockEmbedder;
pub use mock_provider::{MockProvider, ScriptedFactory};
pub use mock_reader::StaticReader;
pub use mock_store::MemoryVectorStore;
pub use mock_tool::RecordingTool;
