// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool that records invocations and returns a fixed reply.

use async_trait::async_trait;
use tokio::sync::Mutex;

use agentry_core::AgentryError;
use agentry_tools::{Tool, ToolOutput};

pub struct RecordingTool {
    name: String,
    reply: String,
    calls: Mutex<Vec<serde_json::Value>>,
}

impl RecordingTool {
    pub fn new(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Arguments of every invocation so far.
    pub async fn calls(&self) -> Vec<serde_json::Value> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records its input and returns a canned reply"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {"query": {"type": "string"}},
            "required": ["query"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, AgentryError> {
        self.calls.lock().await.push(input);
        Ok(ToolOutput::ok(self.reply.clone()))
    }
}
