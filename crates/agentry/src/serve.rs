// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agentry serve`: build the web agent and hand it to the playground.

use std::sync::Arc;
use std::time::Duration;

use agentry_agent::ConversationalAgentBuilder;
use agentry_config::AgentryConfig;
use agentry_core::types::ProviderTier;
use agentry_core::AgentryError;
use agentry_gateway::{GatewayState, ServerConfig, start_server};
use agentry_tools::{DuckDuckGoSearch, SearchSettings, Tool};
use tracing::info;

/// The toolset attached to the web agent.
fn toolset(config: &AgentryConfig) -> Result<Vec<Arc<dyn Tool>>, AgentryError> {
    if !config.search.enabled {
        return Ok(Vec::new());
    }
    let search = DuckDuckGoSearch::new(SearchSettings {
        max_results: config.search.max_results,
        timeout: Duration::from_secs(config.search.timeout_secs),
        ..SearchSettings::default()
    })?;
    let search: Arc<dyn Tool> = Arc::new(search);
    Ok(vec![search])
}

pub async fn run_serve(config: AgentryConfig) -> Result<(), AgentryError> {
    info!("starting agentry serve");

    let primary = config.backend_candidate(ProviderTier::Primary);
    let fallback = config.backend_candidate(ProviderTier::Fallback);

    let agent = ConversationalAgentBuilder::new()
        .name(config.agent.name.clone())
        .markdown(config.agent.markdown)
        .build(toolset(&config)?, &primary, &fallback, &config.storage_path())
        .await?;

    info!(
        agent = %agent.id(),
        backend = %agent.descriptor().backend().label(),
        "web agent ready"
    );

    let server = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server, GatewayState::new(vec![Arc::new(agent)])).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_tool_follows_config() {
        let mut config = agentry_config::load_and_validate_str("").unwrap();
        let tools = toolset(&config).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "duckduckgo_search");

        config.search.enabled = false;
        assert!(toolset(&config).unwrap().is_empty());
    }
}
