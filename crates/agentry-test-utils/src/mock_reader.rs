// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document reader serving canned text per URL.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use agentry_core::traits::DocumentReader;
use agentry_core::types::Document;
use agentry_core::AgentryError;

/// Returns one document per known URL; unknown URLs fail with `DocumentFetch`.
#[derive(Default)]
pub struct StaticReader {
    documents: HashMap<String, String>,
    reads: Mutex<Vec<String>>,
}

impl StaticReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, text: &str) -> Self {
        self.documents.insert(url.to_string(), text.to_string());
        self
    }

    /// URLs read so far, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentReader for StaticReader {
    async fn read(&self, url: &str) -> Result<Vec<Document>, AgentryError> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(url.to_string());
        }
        let text = self.documents.get(url).ok_or_else(|| AgentryError::DocumentFetch {
            url: url.to_string(),
            message: "connection refused".to_string(),
        })?;
        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        let mut meta = serde_json::Map::new();
        meta.insert("url".into(), serde_json::Value::String(url.to_string()));
        Ok(vec![Document {
            name,
            content: text.clone(),
            meta,
        }])
    }
}
