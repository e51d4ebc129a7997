// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite conversation-history storage for Agentry.
//!
//! Each agent identity owns one table inside a shared database file; rows
//! are keyed by session id. All access goes through a single
//! `tokio-rusqlite` connection, whose background thread serializes writes.

pub mod database;
pub mod history;

pub use database::Database;
pub use history::SqliteHistory;
