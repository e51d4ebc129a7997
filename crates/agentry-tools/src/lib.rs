// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tools that agents may call, and the registry the agent loop dispatches through.

pub mod builtin;
pub mod tool;

pub use builtin::duckduckgo::{DuckDuckGoSearch, SearchSettings};
pub use tool::{Tool, ToolOutput, ToolRegistry};
