// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Replicated workspace status cache.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::broadcast;
use wharf_core::{AttemptId, NodeId, WorkspaceId, WorkspaceStatus};

use crate::error::CoordError;

/// One cache entry: the status of a workspace as last published.
///
/// `epoch_ms` is the publication time and drives last-writer-wins
/// reconciliation; `node` breaks ties and names the publisher. An absent
/// entry means the workspace is stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: WorkspaceStatus,
    pub node: NodeId,
    pub epoch_ms: u64,
    pub attempt: AttemptId,
}

impl StatusEntry {
    /// Whether this entry supersedes `other` under (epoch_ms, node) order.
    pub fn supersedes(&self, other: &StatusEntry) -> bool {
        self.epoch_ms > other.epoch_ms
            || (self.epoch_ms == other.epoch_ms && self.node.as_str() >= other.node.as_str())
    }
}

/// Shared status cache every node consults instead of local memory.
#[async_trait]
pub trait StatusCache: Clone + Send + Sync + 'static {
    async fn get(&self, workspace_id: &WorkspaceId) -> Result<Option<StatusEntry>, CoordError>;

    /// Write an entry. Applies last-writer-wins: returns `false` when a
    /// newer entry was already present and the write was discarded.
    async fn put(&self, workspace_id: &WorkspaceId, entry: StatusEntry)
        -> Result<bool, CoordError>;

    /// Drop the entry; the workspace reads as stopped afterwards.
    async fn remove(&self, workspace_id: &WorkspaceId) -> Result<(), CoordError>;

    /// All current entries, for sweeps and recovery.
    async fn snapshot(&self) -> Result<IndexMap<WorkspaceId, StatusEntry>, CoordError>;

    /// Stream of applied writes. This is how a node learns that a peer
    /// published a stopping intent for a runtime it is starting.
    fn subscribe(&self) -> broadcast::Receiver<(WorkspaceId, StatusEntry)>;
}
