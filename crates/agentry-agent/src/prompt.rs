// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt assembly.

use std::fmt::Write;

use chrono::{DateTime, TimeZone};

use crate::descriptor::AgentDescriptor;

pub const MARKDOWN_INSTRUCTION: &str = "Use markdown to format your answers.";

/// Renders the descriptor's instructions as a system prompt.
///
/// The fixed instructions come first, in order, followed by the current
/// time (when enabled) and the markdown instruction (when enabled).
pub fn system_prompt<Tz>(descriptor: &AgentDescriptor, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut prompt = format!("You are {}.\n\n## Instructions\n", descriptor.name());
    for instruction in descriptor.instructions() {
        let _ = writeln!(prompt, "- {instruction}");
    }
    if descriptor.add_datetime_to_instructions() {
        let _ = writeln!(prompt, "- The current time is {}", now.format("%Y-%m-%d %H:%M:%S %Z"));
    }
    if descriptor.markdown() {
        let _ = writeln!(prompt, "- {MARKDOWN_INSTRUCTION}");
    }
    prompt
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agentry_core::types::{BackendCandidate, BackendKind, OllamaParams, ProviderTier};
    use chrono::Utc;

    use super::*;
    use crate::descriptor::WEB_AGENT_INSTRUCTIONS;

    fn descriptor() -> AgentDescriptor {
        AgentDescriptor::new(
            "Web Agent",
            BackendCandidate::new(
                ProviderTier::Fallback,
                "gemma2:2b",
                BackendKind::Ollama(OllamaParams {
                    host: "http://localhost:11434".into(),
                    timeout: Duration::from_secs(120),
                }),
            ),
            vec![],
            WEB_AGENT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn instructions_then_time_then_markdown() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let prompt = system_prompt(&descriptor().with_markdown(true), &now);

        let sources = prompt.find("Always include sources").unwrap();
        let error = prompt.find("explain what might have caused it").unwrap();
        let time = prompt.find("The current time is 2026-03-01 09:30:00").unwrap();
        let markdown = prompt.find(MARKDOWN_INSTRUCTION).unwrap();
        assert!(sources < error && error < time && time < markdown);
    }

    #[test]
    fn optional_lines_can_be_disabled() {
        let now = Utc::now();
        let prompt = system_prompt(&descriptor().with_datetime(false), &now);
        assert!(!prompt.contains("The current time is"));
        assert!(!prompt.contains(MARKDOWN_INSTRUCTION));
        assert!(prompt.starts_with("You are Web Agent."));
    }
}
