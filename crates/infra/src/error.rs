// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Infrastructure error taxonomy.
//!
//! `Transient` failures are retried inside the adapter with bounded
//! backoff; once the budget is exhausted they are reclassified as `Fatal`
//! and propagate. `Fatal` failures (invalid spec, quota exceeded) propagate
//! immediately and trigger cleanup of partially created resources.

use thiserror::Error;

/// Errors from infrastructure adapters.
#[derive(Debug, Clone, Error)]
pub enum InfraError {
    /// Backend hiccup worth retrying (timeout, connection refused, 5xx).
    #[error("transient backend error: {0}")]
    Transient(String),
    /// Structural failure; never retried.
    #[error("infrastructure error: {0}")]
    Fatal(String),
    /// The start attempt was cancelled between backend calls.
    #[error("start interrupted")]
    Interrupted,
    /// The handle references a runtime the backend no longer knows.
    #[error("runtime not found: {0}")]
    NotFound(String),
}

impl InfraError {
    pub fn is_transient(&self) -> bool {
        matches!(self, InfraError::Transient(_))
    }

    /// Whether the failure means the resource is simply not there.
    ///
    /// Stop and destroy treat these as success; a runtime that is already
    /// gone is exactly what those operations want.
    pub fn is_missing(&self) -> bool {
        match self {
            InfraError::NotFound(_) => true,
            InfraError::Fatal(msg) => {
                let lower = msg.to_ascii_lowercase();
                lower.contains("no such") || lower.contains("not found")
            }
            _ => false,
        }
    }

    /// Classify a backend CLI failure by its stderr.
    ///
    /// The transient markers cover the docker daemon and kubernetes API
    /// server messages seen in practice; anything else is structural.
    pub fn from_backend_stderr(stderr: &str) -> Self {
        const TRANSIENT_MARKERS: &[&str] = &[
            "timeout",
            "timed out",
            "connection refused",
            "connection reset",
            "temporarily unavailable",
            "too many requests",
            "i/o timeout",
            "service unavailable",
            "etcdserver: request timed out",
        ];
        let lower = stderr.to_ascii_lowercase();
        if TRANSIENT_MARKERS.iter().any(|m| lower.contains(m)) {
            InfraError::Transient(stderr.trim().to_string())
        } else {
            InfraError::Fatal(stderr.trim().to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
