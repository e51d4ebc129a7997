// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetches documents over HTTP and extracts their text.

use std::time::Duration;

use agentry_core::traits::DocumentReader;
use agentry_core::types::Document;
use agentry_core::AgentryError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// PDF page separator emitted by the text extractor.
const PAGE_BREAK: char = '\u{c}';

/// Reads PDFs (one document per page) and UTF-8 text (one document) from URLs.
#[derive(Debug, Clone)]
pub struct UrlDocumentReader {
    client: reqwest::Client,
}

impl UrlDocumentReader {
    pub fn new(timeout: Duration) -> Result<Self, AgentryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agentry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentryError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn fetch_err(url: &str, message: impl Into<String>) -> AgentryError {
    AgentryError::DocumentFetch {
        url: url.to_string(),
        message: message.into(),
    }
}

/// File stem of the URL's last path segment, e.g. `thinkpython` for `.../thinkpython.pdf`.
pub fn document_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
    if stem.is_empty() { "document".to_string() } else { stem.to_string() }
}

fn looks_like_pdf(url: &str, content_type: Option<&str>, body: &[u8]) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/pdf"))
        || url.split(['?', '#']).next().is_some_and(|p| p.to_ascii_lowercase().ends_with(".pdf"))
        || body.starts_with(b"%PDF")
}

fn base_meta(url: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut meta = serde_json::Map::new();
    meta.insert("url".into(), serde_json::Value::String(url.to_string()));
    meta
}

/// Splits extracted PDF text into one document per non-empty page.
pub fn pdf_pages(url: &str, text: &str) -> Vec<Document> {
    let name = document_name(url);
    text.split(PAGE_BREAK)
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| {
            let mut meta = base_meta(url);
            meta.insert("page".into(), serde_json::Value::from(i + 1));
            Document {
                name: format!("{name}_{}", i + 1),
                content: page.trim().to_string(),
                meta,
            }
        })
        .collect()
}

#[async_trait]
impl DocumentReader for UrlDocumentReader {
    async fn read(&self, url: &str) -> Result<Vec<Document>, AgentryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(url, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(url, format!("server returned {status}")));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_err(url, format!("failed to read body: {e}")))?;
        debug!(url, bytes = body.len(), content_type = ?content_type, "document fetched");

        if looks_like_pdf(url, content_type.as_deref(), &body) {
            let bytes = body.to_vec();
            let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| fetch_err(url, format!("PDF extraction panicked: {e}")))?
                .map_err(|e| fetch_err(url, format!("failed to extract PDF text: {e}")))?;
            let pages = pdf_pages(url, &text);
            if pages.is_empty() {
                return Err(fetch_err(url, "PDF contains no extractable text"));
            }
            return Ok(pages);
        }

        let text = String::from_utf8(body.to_vec())
            .map_err(|_| fetch_err(url, "document is neither a PDF nor UTF-8 text"))?;
        if text.trim().is_empty() {
            return Err(fetch_err(url, "document is empty"));
        }
        Ok(vec![Document {
            name: document_name(url),
            content: text,
            meta: base_meta(url),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn names_come_from_the_last_segment() {
        assert_eq!(
            document_name("https://example.com/uploads/garth_stein.pdf?dl=1"),
            "garth_stein"
        );
        assert_eq!(document_name("https://example.com/notes/"), "notes");
        assert_eq!(document_name("https://example.com/"), "example");
    }

    #[test]
    fn pdf_detection() {
        assert!(looks_like_pdf("https://x/a.PDF", None, b""));
        assert!(looks_like_pdf("https://x/a", Some("application/pdf"), b""));
        assert!(looks_like_pdf("https://x/a", None, b"%PDF-1.7"));
        assert!(!looks_like_pdf("https://x/a.txt", Some("text/plain"), b"hello"));
    }

    #[test]
    fn pages_are_numbered_and_blank_pages_skipped() {
        let pages = pdf_pages("https://x/book.pdf", "first\u{c}  \u{c}third");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name, "book_1");
        assert_eq!(pages[1].name, "book_3");
        assert_eq!(pages[1].meta["page"], 3);
        assert_eq!(pages[1].meta["url"], "https://x/book.pdf");
    }

    #[tokio::test]
    async fn reads_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("Eve was a character."),
            )
            .mount(&server)
            .await;

        let reader = UrlDocumentReader::new(Duration::from_secs(5)).unwrap();
        let docs = reader.read(&format!("{}/notes.txt", server.uri())).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "notes");
        assert_eq!(docs[0].content, "Eve was a character.");
    }

    #[tokio::test]
    async fn http_errors_name_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.pdf", server.uri());
        let reader = UrlDocumentReader::new(Duration::from_secs(5)).unwrap();
        match reader.read(&url).await.unwrap_err() {
            AgentryError::DocumentFetch { url: u, message } => {
                assert_eq!(u, url);
                assert!(message.contains("404"));
            }
            other => panic!("expected DocumentFetch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_pdf_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4 not really a pdf".to_vec()),
            )
            .mount(&server)
            .await;

        let reader = UrlDocumentReader::new(Duration::from_secs(5)).unwrap();
        let err = reader.read(&format!("{}/bad.pdf", server.uri())).await.unwrap_err();
        assert!(matches!(err, AgentryError::DocumentFetch { .. }));
    }
}
