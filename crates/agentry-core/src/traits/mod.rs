// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod embedding;
pub mod factory;
pub mod provider;
pub mod reader;
pub mod storage;
pub mod vector_store;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use factory::ProviderFactory;
pub use provider::ProviderAdapter;
pub use reader::DocumentReader;
pub use storage::HistoryAdapter;
pub use vector_store::VectorStoreAdapter;
