// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source document reader trait used by knowledge ingestion.

use async_trait::async_trait;

use crate::error::AgentryError;
use crate::types::Document;

/// Fetches a source and turns it into text documents.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Reads `url`. Failures should be [`AgentryError::DocumentFetch`] naming the URL.
    async fn read(&self, url: &str) -> Result<Vec<Document>, AgentryError>;
}
