// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search through DuckDuckGo's HTML endpoint.
//!
//! The endpoint is scraped rather than called through an API: results live
//! in `.result` blocks whose title links point at a `uddg=` redirect.

use std::time::Duration;

use agentry_core::AgentryError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, warn};

use crate::tool::{Tool, ToolOutput};

pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Upper bound on `max_results` a model may request in one call.
const MAX_RESULTS_CAP: usize = 20;

/// Search tool settings.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub max_results: usize,
    pub timeout: Duration,
    pub endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 5,
            timeout: Duration::from_secs(30),
            endpoint: DUCKDUCKGO_HTML_URL.to_string(),
        }
    }
}

/// One scraped search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub position: usize,
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// The `duckduckgo_search` tool.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    settings: SearchSettings,
}

impl DuckDuckGoSearch {
    pub fn new(settings: SearchSettings) -> Result<Self, AgentryError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AgentryError::Tool {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, settings })
    }

    /// Runs a query and returns at most `max_results` organic results.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, AgentryError> {
        let body = format!("q={}&b=&kl=", urlencoding::encode(query));
        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| AgentryError::Tool {
                message: format!("search request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentryError::Tool {
                message: format!("search endpoint returned {status}"),
                source: None,
            });
        }

        let html = response.text().await.map_err(|e| AgentryError::Tool {
            message: format!("failed to read search response: {e}"),
            source: Some(Box::new(e)),
        })?;
        let results = parse_results(&html, max_results)?;
        debug!(query, count = results.len(), "search completed");
        Ok(results)
    }
}

fn selector(css: &str) -> Result<Selector, AgentryError> {
    Selector::parse(css).map_err(|e| AgentryError::Internal(format!("invalid selector `{css}`: {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves DuckDuckGo's `//duckduckgo.com/l/?uddg=<encoded>&rut=...` redirect links.
fn clean_link(href: &str) -> String {
    if href.contains("duckduckgo.com/l/")
        && let Some(encoded) = href.split("uddg=").nth(1)
    {
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    href.to_string()
}

/// Extracts organic results from the HTML results page, skipping ads.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, AgentryError> {
    let document = Html::parse_document(html);
    let result_sel = selector(".result")?;
    let link_sel = selector(".result__title a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();
    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }
        if element.value().classes().any(|c| c == "result--ad") {
            continue;
        }
        let Some(link_elem) = element.select(&link_sel).next() else {
            continue;
        };
        let href = link_elem.value().attr("href").unwrap_or_default();
        if href.is_empty() || href.contains("y.js") {
            continue;
        }
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        results.push(SearchResult {
            position: results.len() + 1,
            title: element_text(link_elem),
            link: clean_link(href),
            snippet,
        });
    }
    Ok(results)
}

/// Renders results as the text block handed back to the model.
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!(
            "No results were found for \"{query}\". The search service may be rate limiting requests; try rephrasing the query."
        );
    }
    let mut out = format!("Found {} search results for \"{query}\":\n", results.len());
    for r in results {
        out.push_str(&format!(
            "\n{}. {}\n   URL: {}\n   Summary: {}\n",
            r.position, r.title, r.link, r.snippet
        ));
    }
    out
}

#[async_trait]
impl Tool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo_search"
    }

    fn description(&self) -> &str {
        "Search the web with DuckDuckGo. Returns titles, URLs and summaries of the top results."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The search query"},
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "minimum": 1,
                    "maximum": MAX_RESULTS_CAP
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, AgentryError> {
        let Some(query) = input["query"].as_str().map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(ToolOutput::error("missing required 'query' parameter"));
        };
        let max_results = input["max_results"]
            .as_u64()
            .map(|n| (n as usize).clamp(1, MAX_RESULTS_CAP))
            .unwrap_or(self.settings.max_results);

        match self.search(query, max_results).await {
            Ok(results) => Ok(ToolOutput::ok(format_results(query, &results))),
            Err(e) => {
                warn!(query, error = %e, "web search failed");
                Ok(ToolOutput::error(format!("Search failed: {e}")))
            }
        }
    }
}
