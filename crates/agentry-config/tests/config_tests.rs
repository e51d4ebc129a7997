// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Agentry configuration system.

use agentry_config::diagnostic::ConfigError;
use agentry_config::model::{AgentryConfig, BackendName, VectorDb};
use agentry_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_path, load_config_from_str,
};
use serial_test::serial;

/// Valid TOML with all sections deserializes successfully.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
name = "Research Agent"
log_level = "debug"
markdown = false

[backend]
primary = "ollama"
fallback = "groq"

[groq]
api_key = "gsk-123"
model = "llama-3.1-8b-instant"

[ollama]
host = "http://gpu-box:11434"
model = "llama3.2"
timeout_secs = 300

[storage]
database_path = "/var/lib/agentry/agents.db"

[search]
max_results = 8

[gateway]
host = "0.0.0.0"
port = 8080

[knowledge]
vector_db = "qdrant"
collection = "recipes"
sources = ["https://example.com/a.pdf", "https://example.com/b.pdf"]
num_documents = 3

[qdrant]
url = "http://localhost:6333"

[embedder]
model = "nomic-embed-text"
dimensions = 768
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "Research Agent");
    assert!(!config.agent.markdown);
    assert_eq!(config.backend.primary, BackendName::Ollama);
    assert_eq!(config.backend.fallback, BackendName::Groq);
    assert_eq!(config.groq.api_key.as_deref(), Some("gsk-123"));
    assert_eq!(config.groq.base_url, "https://api.groq.com/openai/v1");
    assert_eq!(config.ollama.timeout_secs, 300);
    assert_eq!(config.search.max_results, 8);
    assert!(config.search.enabled);
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.knowledge.vector_db, VectorDb::Qdrant);
    assert_eq!(config.knowledge.sources.len(), 2);
    assert_eq!(config.knowledge.chunk_size, 5000);
    assert_eq!(config.embedder.dimensions, 768);
    assert_eq!(config.embedder.timeout_secs, 1000);
}

#[test]
fn empty_toml_yields_documented_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert_eq!(config.agent.name, "Web Agent");
    assert!(config.agent.markdown);
    assert_eq!(config.backend.primary, BackendName::Groq);
    assert_eq!(config.backend.fallback, BackendName::Ollama);
    assert_eq!(config.groq.model, "llama-3.3-70b-versatile");
    assert_eq!(config.ollama.host, "http://localhost:11434");
    assert_eq!(config.ollama.model, "gemma2:2b");
    assert_eq!(config.storage.database_path, "tmp/agents.db");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 7172);
    assert_eq!(config.knowledge.vector_db, VectorDb::Mongodb);
    assert_eq!(config.knowledge.collection, "vector-embeddings");
    assert_eq!(config.knowledge.num_documents, 5);
    assert_eq!(config.mongo.database, "agentry");
    assert!(config.mongo.vector_index.is_none());
    assert_eq!(config.embedder.model, "openhermes");
    assert!(config.qdrant.url.is_none());
}

#[test]
fn unknown_key_gets_suggestion_and_span() {
    let toml = "[groq]\nmodle = \"llama\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "modle");
            assert_eq!(suggestion.as_deref(), Some("model"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[anthropic]\napi_key = \"x\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn unknown_backend_name_is_rejected() {
    let errors = load_and_validate_str("[backend]\nprimary = \"grok\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidValue { detail, .. } => assert!(detail.contains("grok")),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[gateway]\nport = \"seven\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn semantic_errors_are_all_reported() {
    let toml = r#"
[backend]
primary = "ollama"
fallback = "ollama"

[knowledge]
chunk_size = 0
sources = ["not-a-url"]
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
#[serial]
fn file_then_env_override() {
    let dir = std::env::temp_dir().join(format!("agentry-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("agentry.toml");
    std::fs::write(&path, "[agent]\nname = \"File Agent\"\n\n[groq]\nmodel = \"from-file\"\n").unwrap();

    // SAFETY: test-only env mutation. Tests using env vars run serially.
    unsafe { std::env::set_var("AGENTRY_GROQ_MODEL", "from-env") };
    let config = load_config_from_path(&path);
    unsafe { std::env::remove_var("AGENTRY_GROQ_MODEL") };
    std::fs::remove_dir_all(&dir).ok();

    let config: AgentryConfig = config.expect("config should load");
    assert_eq!(config.agent.name, "File Agent");
    assert_eq!(config.groq.model, "from-env");
}

#[test]
#[serial]
fn env_override_reaches_underscored_keys() {
    let dir = std::env::temp_dir().join(format!("agentry-config-env-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("agentry.toml");
    std::fs::write(&path, "").unwrap();

    unsafe { std::env::set_var("AGENTRY_EMBEDDER_TIMEOUT_SECS", "42") };
    let config = load_and_validate_path(&path);
    unsafe { std::env::remove_var("AGENTRY_EMBEDDER_TIMEOUT_SECS") };
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(config.expect("valid").embedder.timeout_secs, 42);
}
