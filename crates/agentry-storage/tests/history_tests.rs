// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for per-agent history tables sharing one database file.

use agentry_core::types::{HistoryStore, Role};
use agentry_core::{AgentryError, HistoryAdapter};
use agentry_storage::SqliteHistory;

#[tokio::test]
async fn agents_are_isolated_by_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tmp/agents.db");

    let web = SqliteHistory::open(&HistoryStore {
        path: path.clone(),
        table: "web_agent".into(),
    })
    .await
    .unwrap();
    let kb = SqliteHistory::open(&HistoryStore {
        path: path.clone(),
        table: "knowledge_agent".into(),
    })
    .await
    .unwrap();

    web.append("shared-session", Role::User, "web question").await.unwrap();
    kb.append("shared-session", Role::User, "kb question").await.unwrap();

    let web_msgs = web.session_messages("shared-session").await.unwrap();
    assert_eq!(web_msgs.len(), 1);
    assert_eq!(web_msgs[0].content, "web question");
    assert_eq!(kb.session_messages("shared-session").await.unwrap().len(), 1);
}

#[tokio::test]
async fn opening_twice_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore {
        path: dir.path().join("agents.db"),
        table: "web_agent".into(),
    };

    let first = SqliteHistory::open(&store).await.unwrap();
    first.append("s", Role::User, "one").await.unwrap();

    let second = SqliteHistory::open(&store).await.unwrap();
    assert_eq!(second.session_messages("s").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unwritable_location_is_storage_init() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain-file");
    std::fs::write(&file, "x").unwrap();

    let err = SqliteHistory::open(&HistoryStore {
        path: file.join("agents.db"),
        table: "web_agent".into(),
    })
    .await
    .err()
    .expect("opening beneath a regular file must fail");
    assert!(matches!(err, AgentryError::StorageInit { .. }));
    assert!(!err.is_backend_failure());
}
