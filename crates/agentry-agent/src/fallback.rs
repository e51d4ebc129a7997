// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-tier backend selection.

use agentry_core::AgentryError;
use agentry_core::types::BackendCandidate;
use tracing::{info, warn};

/// Tries `attempt` on `primary`, then exactly once on `fallback`.
///
/// Only backend failures ([`AgentryError::is_backend_failure`]) move on to
/// the fallback; any other error is returned as is. A primary failure emits
/// one `warn` event naming the primary backend. When both fail the result is
/// [`AgentryError::BackendUnavailable`] carrying both reasons.
pub fn with_fallback<T>(
    primary: &BackendCandidate,
    fallback: &BackendCandidate,
    mut attempt: impl FnMut(&BackendCandidate) -> Result<T, AgentryError>,
) -> Result<(BackendCandidate, T), AgentryError> {
    let primary_err = match attempt(primary) {
        Ok(value) => {
            info!(backend = %primary.label(), tier = %primary.tier, "completion backend selected");
            return Ok((primary.clone(), value));
        }
        Err(e) if e.is_backend_failure() => e,
        Err(e) => return Err(e),
    };

    warn!(
        backend = %primary.label(),
        fallback = %fallback.label(),
        error = %primary_err,
        "primary backend unavailable, falling back"
    );

    match attempt(fallback) {
        Ok(value) => {
            info!(backend = %fallback.label(), tier = %fallback.tier, "completion backend selected");
            Ok((fallback.clone(), value))
        }
        Err(e) if e.is_backend_failure() => Err(AgentryError::BackendUnavailable {
            primary: format!("{}: {primary_err}", primary.label()),
            fallback: format!("{}: {e}", fallback.label()),
        }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use agentry_core::types::{BackendKind, GroqParams, OllamaParams, ProviderTier};
    use tracing_test::traced_test;

    fn groq() -> BackendCandidate {
        BackendCandidate::new(
            ProviderTier::Primary,
            "llama-3.3-70b-versatile",
            BackendKind::Groq(GroqParams {
                api_key: None,
                base_url: "https://api.groq.com/openai/v1".into(),
                timeout: Duration::from_secs(60),
            }),
        )
    }

    fn ollama() -> BackendCandidate {
        BackendCandidate::new(
            ProviderTier::Fallback,
            "gemma2:2b",
            BackendKind::Ollama(OllamaParams {
                host: "http://localhost:11434".into(),
                timeout: Duration::from_secs(120),
            }),
        )
    }

    #[traced_test]
    #[test]
    fn primary_success_skips_fallback() {
        let mut tried = Vec::new();
        let (chosen, value) = with_fallback(&groq(), &ollama(), |c| {
            tried.push(c.label());
            Ok::<_, AgentryError>(42)
        })
        .unwrap();
        assert_eq!(chosen.tier, ProviderTier::Primary);
        assert_eq!(value, 42);
        assert_eq!(tried, ["groq/llama-3.3-70b-versatile"]);
        assert!(!logs_contain("falling back"));
    }

    #[traced_test]
    #[test]
    fn primary_failure_binds_fallback_with_one_warning() {
        let (chosen, _) = with_fallback(&groq(), &ollama(), |c| match c.tier {
            ProviderTier::Primary => Err(AgentryError::provider("groq", "GROQ_API_KEY is not set")),
            ProviderTier::Fallback => Ok(()),
        })
        .unwrap();
        assert_eq!(chosen, ollama());

        logs_assert(|lines: &[&str]| {
            let warnings: Vec<_> = lines.iter().filter(|l| l.contains("WARN")).collect();
            match warnings.as_slice() {
                [only] if only.contains("groq/llama-3.3-70b-versatile") => Ok(()),
                other => Err(format!("expected one warning naming groq, got {other:?}")),
            }
        });
    }

    #[test]
    fn both_failing_reports_both_reasons() {
        let err = with_fallback(&groq(), &ollama(), |c| {
            Err::<(), _>(AgentryError::provider(
                c.kind.provider_name(),
                format!("{} broke", c.kind.provider_name()),
            ))
        })
        .unwrap_err();
        match err {
            AgentryError::BackendUnavailable { primary, fallback } => {
                assert!(primary.contains("groq broke"));
                assert!(fallback.contains("ollama broke"));
            }
            other => panic!("expected BackendUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn non_backend_error_does_not_fall_back() {
        let mut attempts = 0;
        let err = with_fallback(&groq(), &ollama(), |_| {
            attempts += 1;
            Err::<(), _>(AgentryError::Internal("disk on fire".into()))
        })
        .unwrap_err();
        assert!(matches!(err, AgentryError::Internal(_)));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn fallback_is_tried_exactly_once() {
        let mut attempts = 0;
        let _ = with_fallback(&groq(), &ollama(), |_| {
            attempts += 1;
            Err::<(), _>(AgentryError::Config("nope".into()))
        });
        assert_eq!(attempts, 2);
    }
}
