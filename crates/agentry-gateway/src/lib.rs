// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Playground HTTP API for Agentry agents.
//!
//! Serves a fixed set of agents built at startup. Each request runs against
//! the shared [`Agent`](agentry_agent::Agent); the only mutable state is the
//! agent's history store.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
