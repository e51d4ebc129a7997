// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational agent assembly for Agentry.
//!
//! [`ConversationalAgentBuilder`] resolves a completion backend through the
//! two-tier [`with_fallback`] combinator, opens persistent history and
//! produces an [`Agent`] whose [`AgentDescriptor`] is fixed for its lifetime.
//! [`Agent::run`] drives one request/tool-call/reply exchange.

pub mod agent;
pub mod builder;
pub mod descriptor;
pub mod explain;
pub mod factory;
pub mod fallback;
pub mod prompt;

pub use agent::{Agent, RunResponse, ToolInvocation};
pub use builder::ConversationalAgentBuilder;
pub use descriptor::{AgentDescriptor, HistoryPolicy};
pub use factory::HttpProviderFactory;
pub use fallback::with_fallback;
