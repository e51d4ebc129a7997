// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the playground API.

use std::sync::Arc;

use agentry_agent::descriptor::AgentSummary;
use agentry_agent::{Agent, RunResponse};
use agentry_core::types::{SessionSummary, StoredMessage};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::server::GatewayState;

/// Request body for `POST /v1/playground/agents/{agent_id}/runs`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub playground: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<StoredMessage>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

fn find_agent(state: &GatewayState, agent_id: &str) -> Result<Arc<Agent>, Response> {
    state
        .agent(agent_id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("unknown agent `{agent_id}`")))
}

fn internal(err: agentry_core::AgentryError) -> Response {
    error!(error = %err, "playground request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /v1/playground/status
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        playground: "available".to_string(),
    })
}

/// GET /v1/playground/agents
pub async fn list_agents(State(state): State<GatewayState>) -> Json<Vec<AgentSummary>> {
    Json(state.agents.iter().map(|a| a.descriptor().summary()).collect())
}

/// POST /v1/playground/agents/{agent_id}/runs
pub async fn create_run(
    State(state): State<GatewayState>,
    Path(agent_id): Path<String>,
    Json(body): Json<RunRequest>,
) -> Result<Json<RunResponse>, Response> {
    let agent = find_agent(&state, &agent_id)?;
    if body.message.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "message must not be empty"));
    }
    agent
        .run(body.session_id.as_deref(), &body.message)
        .await
        .map(Json)
        .map_err(internal)
}

/// GET /v1/playground/agents/{agent_id}/sessions
pub async fn list_sessions(
    State(state): State<GatewayState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<SessionSummary>>, Response> {
    let agent = find_agent(&state, &agent_id)?;
    let Some(history) = agent.history() else {
        return Ok(Json(Vec::new()));
    };
    history.list_sessions().await.map(Json).map_err(internal)
}

/// GET /v1/playground/agents/{agent_id}/sessions/{session_id}
pub async fn get_session(
    State(state): State<GatewayState>,
    Path((agent_id, session_id)): Path<(String, String)>,
) -> Result<Json<SessionResponse>, Response> {
    let agent = find_agent(&state, &agent_id)?;
    let messages = match agent.history() {
        Some(history) => history.session_messages(&session_id).await.map_err(internal)?,
        None => Vec::new(),
    };
    if messages.is_empty() {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("unknown session `{session_id}`"),
        ));
    }
    Ok(Json(SessionResponse {
        session_id,
        messages,
    }))
}

/// DELETE /v1/playground/agents/{agent_id}/sessions/{session_id}
pub async fn delete_session(
    State(state): State<GatewayState>,
    Path((agent_id, session_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, Response> {
    let agent = find_agent(&state, &agent_id)?;
    let deleted = match agent.history() {
        Some(history) => history.delete_session(&session_id).await.map_err(internal)?,
        None => 0,
    };
    if deleted == 0 {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("unknown session `{session_id}`"),
        ));
    }
    Ok(Json(DeleteResponse { deleted }))
}
