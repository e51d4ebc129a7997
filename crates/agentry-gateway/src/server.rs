// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Playground HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use agentry_agent::Agent;
use agentry_core::AgentryError;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub agents: Arc<Vec<Arc<Agent>>>,
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(agents: Vec<Arc<Agent>>) -> Self {
        Self {
            agents: Arc::new(agents),
            start_time: Instant::now(),
        }
    }

    pub fn agent(&self, agent_id: &str) -> Option<Arc<Agent>> {
        self.agents.iter().find(|a| a.id() == agent_id).cloned()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// All playground routes, with permissive CORS for browser playgrounds.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/playground/status", get(handlers::get_status))
        .route("/v1/playground/agents", get(handlers::list_agents))
        .route("/v1/playground/agents/{agent_id}/runs", post(handlers::create_run))
        .route("/v1/playground/agents/{agent_id}/sessions", get(handlers::list_sessions))
        .route(
            "/v1/playground/agents/{agent_id}/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AgentryError> {
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentryError::Internal(format!("failed to bind playground to {addr}: {e}")))?;

    tracing::info!("playground listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AgentryError::Internal(format!("playground server error: {e}")))?;

    tracing::info!("playground stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
