// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Non-fatal provisioning warnings.
//!
//! Warnings accumulate on an environment while it is being provisioned and
//! are reported to the API layer alongside the start result. The list is
//! append-only: a warning is never removed once attached, and it resets
//! only when a fresh internal environment is built for a new attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed warning codes, one per provisioning decision that can be overridden.
pub mod codes {
    /// Restart policy rewritten to the configured default.
    pub const RESTART_POLICY_OVERRIDDEN: u32 = 4101;
    /// Machine declared no memory limit; the default was applied.
    pub const MEMORY_LIMIT_DEFAULTED: u32 = 4102;
    /// A stale resource left over from a previous attempt was removed.
    pub const STALE_RESOURCE_REMOVED: u32 = 4103;
}

/// One non-fatal provisioning decision, surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: u32,
    pub message: String,
}

impl Warning {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
#[path = "warning_tests.rs"]
mod tests;
