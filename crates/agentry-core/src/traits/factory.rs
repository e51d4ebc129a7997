// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction seam between backend candidates and live providers.

use std::sync::Arc;

use crate::error::AgentryError;
use crate::traits::provider::ProviderAdapter;
use crate::types::BackendCandidate;

/// Turns a [`BackendCandidate`] into a ready provider.
///
/// Construction must not perform network I/O: a failure here means the
/// candidate is unusable as configured (missing key, malformed host), which
/// is what the two-tier fallback reacts to.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, candidate: &BackendCandidate) -> Result<Arc<dyn ProviderAdapter>, AgentryError>;
}
