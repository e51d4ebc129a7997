// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paragraph-aware fixed-size chunking.

use agentry_core::types::Document;

/// Splits a document into chunks of at most `chunk_size` characters.
///
/// Paragraphs (separated by blank lines) are packed greedily; a paragraph
/// longer than `chunk_size` is cut at the last whitespace before the limit,
/// or hard-cut when it has none. Each chunk keeps the document name and
/// metadata, plus a 1-based `chunk` number.
pub fn chunk_document(document: &Document, chunk_size: usize) -> Vec<Document> {
    let chunk_size = chunk_size.max(1);
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs(&document.content) {
        for part in split_long(paragraph, chunk_size) {
            let extra = if current.is_empty() { 0 } else { 2 };
            if !current.is_empty() && char_len(&current) + extra + char_len(part) > chunk_size {
                pieces.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(part);
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            let mut meta = document.meta.clone();
            meta.insert("chunk".into(), serde_json::Value::from(i + 1));
            Document {
                name: document.name.clone(),
                content,
                meta,
            }
        })
        .collect()
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_long(paragraph: &str, chunk_size: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = paragraph;
    while char_len(rest) > chunk_size {
        // byte offset of the `chunk_size`-th char
        let limit = rest
            .char_indices()
            .nth(chunk_size)
            .map_or(rest.len(), |(i, _)| i);
        let cut = rest[..limit]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(limit);
        parts.push(rest[..cut].trim_end());
        rest = rest[cut..].trim_start();
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        let mut meta = serde_json::Map::new();
        meta.insert("page".into(), 3.into());
        Document {
            name: "racing_in_the_rain".into(),
            content: content.into(),
            meta,
        }
    }

    #[test]
    fn short_document_is_one_chunk() {
        let chunks = chunk_document(&doc("Enzo waits.\n\nDenny drives."), 5000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Enzo waits.\n\nDenny drives.");
        assert_eq!(chunks[0].meta["chunk"], 1);
        assert_eq!(chunks[0].meta["page"], 3);
    }

    #[test]
    fn paragraphs_are_packed_up_to_the_limit() {
        let text = "aaaa aaaa\n\nbbbb bbbb\n\ncccc cccc";
        let chunks = chunk_document(&doc(text), 20);
        let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["aaaa aaaa\n\nbbbb bbbb", "cccc cccc"]);
        assert_eq!(chunks[1].meta["chunk"], 2);
    }

    #[test]
    fn long_paragraph_is_cut_at_whitespace() {
        let chunks = chunk_document(&doc("one two three four five six"), 10);
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 10));
        assert_eq!(chunks[0].content, "one two");
        let rejoined: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rejoined.join(" "), "one two three four five six");
    }

    #[test]
    fn multibyte_text_without_spaces_is_hard_cut() {
        let text = "é".repeat(25);
        let chunks = chunk_document(&doc(&text), 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].content.chars().count(), 5);
    }

    #[test]
    fn blank_document_has_no_chunks() {
        assert!(chunk_document(&doc(" \n\n \n"), 100).is_empty());
    }
}
