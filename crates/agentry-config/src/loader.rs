// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./agentry.toml` > `~/.config/agentry/agentry.toml` > `/etc/agentry/agentry.toml`
//! with environment variable overrides via `AGENTRY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AgentryConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/agentry/agentry.toml` (system-wide)
/// 3. `~/.config/agentry/agentry.toml` (user XDG config)
/// 4. `./agentry.toml` (local directory)
/// 5. `AGENTRY_*` environment variables
pub fn load_config() -> Result<AgentryConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AgentryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgentryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AgentryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AgentryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AgentryConfig::default()))
        .merge(Toml::file("/etc/agentry/agentry.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("agentry/agentry.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("agentry.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `AGENTRY_GROQ_API_KEY` must
/// become `groq.api_key`, not `groq.api.key`.
fn env_provider() -> Env {
    Env::prefixed("AGENTRY_").map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        map_env_key(&lowered).into()
    })
}

const SECTIONS: &[&str] = &[
    "agent",
    "backend",
    "groq",
    "ollama",
    "storage",
    "search",
    "gateway",
    "knowledge",
    "qdrant",
    "mongo",
    "embedder",
];

/// Maps a lowercased, prefix-stripped variable name to a dotted figment key.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_only_on_section() {
        assert_eq!(map_env_key("groq_api_key"), "groq.api_key");
        assert_eq!(map_env_key("embedder_timeout_secs"), "embedder.timeout_secs");
        assert_eq!(map_env_key("knowledge_vector_db"), "knowledge.vector_db");
        assert_eq!(map_env_key("mongo_connection_string"), "mongo.connection_string");
    }

    #[test]
    #[serial_test::serial]
    fn uppercase_variables_land_in_their_section() {
        // SAFETY: test-only env mutation, serialized with the other env tests.
        unsafe { std::env::set_var("AGENTRY_OLLAMA_TIMEOUT_SECS", "7") };
        let config: Result<AgentryConfig, _> = Figment::new()
            .merge(Serialized::defaults(AgentryConfig::default()))
            .merge(env_provider())
            .extract();
        unsafe { std::env::remove_var("AGENTRY_OLLAMA_TIMEOUT_SECS") };
        assert_eq!(config.unwrap().ollama.timeout_secs, 7);
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("telemetry_enabled"), "telemetry_enabled");
    }
}
