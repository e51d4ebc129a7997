// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal HTTP client for a local Ollama runtime.

use std::time::Duration;

use agentry_core::AgentryError;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::ApiError;

/// Failure of a single Ollama HTTP call, before it is mapped to a domain error.
#[derive(Debug)]
pub struct CallError {
    pub message: String,
    pub source: Option<reqwest::Error>,
}

/// Validates `host` and returns it without a trailing slash.
pub fn normalize_host(host: &str) -> Result<String, String> {
    let trimmed = host.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| format!("invalid host URL `{host}`: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!("invalid host URL `{host}`: expected http(s)://host[:port]"));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    host: String,
}

impl OllamaClient {
    /// `host` must already be normalized.
    pub fn new(host: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, host })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// POSTs `body` as JSON to `{host}{path}` and decodes the JSON reply.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.host);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CallError {
                message: format!("request to {url} failed: {e}"),
                source: Some(e),
            })?;

        let status = response.status();
        debug!(status = %status, url = %url, "ollama response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api) => format!("Ollama returned {status}: {}", api.error),
                Err(_) => format!("Ollama returned {status}: {body}"),
            };
            return Err(CallError {
                message,
                source: None,
            });
        }

        response.json::<R>().await.map_err(|e| CallError {
            message: format!("failed to decode Ollama response: {e}"),
            source: Some(e),
        })
    }

    /// GET `{host}/api/tags`, used as a liveness check.
    pub async fn ping(&self) -> Result<(), AgentryError> {
        let url = format!("{}/api/tags", self.host);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AgentryError::provider("ollama", format!("Ollama unreachable at {}: {e}", self.host))
        })?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AgentryError::provider(
                "ollama",
                format!("Ollama returned {}", response.status()),
            ))
        }
    }
}
