// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Per-workspace distributed lock.

use async_trait::async_trait;
use std::time::Duration;
use wharf_core::{NodeId, WorkspaceId};

use crate::error::CoordError;

/// Held lock; releases on drop.
///
/// The release closure carries a fencing token chosen at acquisition, so a
/// guard that outlives its lease cannot release a lock re-acquired by
/// someone else.
pub struct LockGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl LockGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

/// Serializes lifecycle operations per workspace across nodes.
#[async_trait]
pub trait LockService: Clone + Send + Sync + 'static {
    /// Acquire the workspace lock, waiting at most `wait` before giving up
    /// with `CoordError::LockBusy`.
    async fn acquire(
        &self,
        workspace_id: &WorkspaceId,
        node: &NodeId,
        wait: Duration,
    ) -> Result<LockGuard, CoordError>;
}
