// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, parseable hosts and non-zero sizes.

use crate::diagnostic::ConfigError;
use crate::model::AgentryConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Returns all collected errors rather than failing on the first one.
pub fn validate_config(config: &AgentryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.backend.primary == config.backend.fallback {
        fail(format!(
            "backend.primary and backend.fallback must differ, both are `{:?}`",
            config.backend.primary
        ));
    }

    for (key, value) in [
        ("groq.base_url", &config.groq.base_url),
        ("ollama.host", &config.ollama.host),
        ("embedder.host", &config.embedder.host),
    ] {
        if !is_http_url(value) {
            fail(format!("{key} `{value}` must be an http:// or https:// URL"));
        }
    }

    for (key, value) in [
        ("groq.model", &config.groq.model),
        ("ollama.model", &config.ollama.model),
        ("embedder.model", &config.embedder.model),
        ("knowledge.collection", &config.knowledge.collection),
        ("mongo.database", &config.mongo.database),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    for (key, value) in [
        ("groq.timeout_secs", config.groq.timeout_secs),
        ("ollama.timeout_secs", config.ollama.timeout_secs),
        ("search.timeout_secs", config.search.timeout_secs),
        ("embedder.timeout_secs", config.embedder.timeout_secs),
    ] {
        if value == 0 {
            fail(format!("{key} must be greater than 0"));
        }
    }

    for (key, value) in [
        ("search.max_results", config.search.max_results),
        ("knowledge.num_documents", config.knowledge.num_documents),
        ("knowledge.chunk_size", config.knowledge.chunk_size),
        ("embedder.dimensions", config.embedder.dimensions),
    ] {
        if value == 0 {
            fail(format!("{key} must be greater than 0"));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!("gateway.host `{host}` is not a valid IP address or hostname"));
    }

    if config.gateway.port == 0 {
        fail("gateway.port must not be 0".to_string());
    }

    for (i, source) in config.knowledge.sources.iter().enumerate() {
        if !is_http_url(source) {
            fail(format!("knowledge.sources[{i}] `{source}` must be an http:// or https:// URL"));
        }
    }

    if let Some(url) = &config.qdrant.url
        && !is_http_url(url)
    {
        fail(format!("qdrant.url `{url}` must be an http:// or https:// URL"));
    }

    if let Some(index) = &config.mongo.vector_index
        && index.trim().is_empty()
    {
        fail("mongo.vector_index must not be empty when set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BackendName;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AgentryConfig::default()).is_ok());
    }

    #[test]
    fn identical_tiers_are_rejected() {
        let mut config = AgentryConfig::default();
        config.backend.fallback = BackendName::Groq;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("must differ"));
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let mut config = AgentryConfig::default();
        config.storage.database_path = " ".into();
        config.gateway.port = 0;
        config.embedder.dimensions = 0;
        config.ollama.host = "localhost:11434".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = AgentryConfig::default();
        config.agent.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn toml_with_identical_tiers_is_rejected() {
        let toml_str = r#"
[backend]
primary = "ollama"
fallback = "ollama"
"#;
        let config: AgentryConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn toml_unknown_backend_fails_to_parse() {
        let toml_str = r#"
[backend]
primary = "openai"
"#;
        assert!(toml::from_str::<AgentryConfig>(toml_str).is_err());
    }

    #[test]
    fn toml_qdrant_selection_is_valid() {
        let toml_str = r#"
[knowledge]
vector_db = "qdrant"
sources = ["https://example.com/book.pdf"]

[qdrant]
url = "http://localhost:6333"
"#;
        let config: AgentryConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_vector_index_is_rejected() {
        let toml_str = r#"
[mongo]
vector_index = " "
"#;
        let config: AgentryConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("mongo.vector_index"));
    }

    #[test]
    fn http_url_check() {
        assert!(is_http_url("http://localhost:11434"));
        assert!(is_http_url("https://api.groq.com/openai/v1"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("http://"));
    }
}
