// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Workspace activity tracking for idle expiry.

use async_trait::async_trait;
use std::time::Duration;
use wharf_core::WorkspaceId;

use crate::error::CoordError;

/// Shared record of when each workspace was last used.
#[async_trait]
pub trait ActivityStore: Clone + Send + Sync + 'static {
    /// Record user activity at `epoch_ms`. Monotonic per workspace:
    /// an older timestamp never overwrites a newer one.
    async fn record(&self, workspace_id: &WorkspaceId, epoch_ms: u64) -> Result<(), CoordError>;

    async fn last_activity(&self, workspace_id: &WorkspaceId)
        -> Result<Option<u64>, CoordError>;

    /// Workspaces whose last activity is older than `idle_timeout` at `now`.
    async fn expired(
        &self,
        idle_timeout: Duration,
        now_ms: u64,
    ) -> Result<Vec<WorkspaceId>, CoordError>;

    /// Forget a workspace once its runtime is gone.
    async fn forget(&self, workspace_id: &WorkspaceId) -> Result<(), CoordError>;
}
