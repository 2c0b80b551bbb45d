// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Cooperative cancellation for in-flight start attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for one start attempt.
///
/// A stop request is a first-class cancellation signal: the provisioner
/// pipeline and the infrastructure adapter check the flag between steps and,
/// once tripped, skip remaining work and proceed to cleanup. Cloning shares
/// the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
