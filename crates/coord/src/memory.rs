// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! In-process coordination backend.
//!
//! All clones share one region, so handing each "node" of a test its own
//! clone models a multi-node deployment faithfully: nothing is exchanged
//! except through the shared cache, lock table, and activity map.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use wharf_core::{NodeId, WorkspaceId};

use crate::activity::ActivityStore;
use crate::cache::{StatusCache, StatusEntry};
use crate::error::CoordError;
use crate::lock::{LockGuard, LockService};

const LOCK_POLL: Duration = Duration::from_millis(5);

struct HeldLock {
    node: NodeId,
    token: u64,
}

struct Shared {
    statuses: Mutex<IndexMap<WorkspaceId, StatusEntry>>,
    locks: Mutex<HashMap<WorkspaceId, HeldLock>>,
    activity: Mutex<HashMap<WorkspaceId, u64>>,
    changes: broadcast::Sender<(WorkspaceId, StatusEntry)>,
    next_token: AtomicU64,
}

/// Memory-backed implementation of all coordination traits.
#[derive(Clone)]
pub struct MemoryCoordinator {
    shared: Arc<Shared>,
}

impl Default for MemoryCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCoordinator {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                statuses: Mutex::new(IndexMap::new()),
                locks: Mutex::new(HashMap::new()),
                activity: Mutex::new(HashMap::new()),
                changes,
                next_token: AtomicU64::new(1),
            }),
        }
    }
}

#[async_trait]
impl StatusCache for MemoryCoordinator {
    async fn get(&self, workspace_id: &WorkspaceId) -> Result<Option<StatusEntry>, CoordError> {
        Ok(self.shared.statuses.lock().get(workspace_id).cloned())
    }

    async fn put(
        &self,
        workspace_id: &WorkspaceId,
        entry: StatusEntry,
    ) -> Result<bool, CoordError> {
        let applied = {
            let mut statuses = self.shared.statuses.lock();
            match statuses.get(workspace_id) {
                Some(current) if !entry.supersedes(current) => false,
                _ => {
                    statuses.insert(workspace_id.clone(), entry.clone());
                    true
                }
            }
        };
        if applied {
            // receivers may be absent; that is not an error
            let _ = self.shared.changes.send((workspace_id.clone(), entry));
        } else {
            tracing::debug!(%workspace_id, "stale status write discarded");
        }
        Ok(applied)
    }

    async fn remove(&self, workspace_id: &WorkspaceId) -> Result<(), CoordError> {
        self.shared.statuses.lock().shift_remove(workspace_id);
        Ok(())
    }

    async fn snapshot(&self) -> Result<IndexMap<WorkspaceId, StatusEntry>, CoordError> {
        Ok(self.shared.statuses.lock().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<(WorkspaceId, StatusEntry)> {
        self.shared.changes.subscribe()
    }
}

#[async_trait]
impl LockService for MemoryCoordinator {
    async fn acquire(
        &self,
        workspace_id: &WorkspaceId,
        node: &NodeId,
        wait: Duration,
    ) -> Result<LockGuard, CoordError> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let token = {
                let mut locks = self.shared.locks.lock();
                if locks.contains_key(workspace_id) {
                    None
                } else {
                    let token = self.shared.next_token.fetch_add(1, Ordering::Relaxed);
                    locks.insert(
                        workspace_id.clone(),
                        HeldLock {
                            node: node.clone(),
                            token,
                        },
                    );
                    Some(token)
                }
            };

            if let Some(token) = token {
                let shared = Arc::clone(&self.shared);
                let key = workspace_id.clone();
                return Ok(LockGuard::new(move || {
                    let mut locks = shared.locks.lock();
                    // fenced release: only the acquiring guard may unlock
                    if locks.get(&key).is_some_and(|held| held.token == token) {
                        locks.remove(&key);
                    }
                }));
            }

            if tokio::time::Instant::now() >= deadline {
                let holder = self
                    .shared
                    .locks
                    .lock()
                    .get(workspace_id)
                    .map(|held| held.node.clone());
                tracing::debug!(%workspace_id, ?holder, "lock wait timed out");
                return Err(CoordError::LockBusy {
                    workspace_id: workspace_id.clone(),
                });
            }
            tokio::time::sleep(LOCK_POLL).await;
        }
    }
}

#[async_trait]
impl ActivityStore for MemoryCoordinator {
    async fn record(&self, workspace_id: &WorkspaceId, epoch_ms: u64) -> Result<(), CoordError> {
        let mut activity = self.shared.activity.lock();
        let slot = activity.entry(workspace_id.clone()).or_insert(epoch_ms);
        if epoch_ms > *slot {
            *slot = epoch_ms;
        }
        Ok(())
    }

    async fn last_activity(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<u64>, CoordError> {
        Ok(self.shared.activity.lock().get(workspace_id).copied())
    }

    async fn expired(
        &self,
        idle_timeout: Duration,
        now_ms: u64,
    ) -> Result<Vec<WorkspaceId>, CoordError> {
        let cutoff = now_ms.saturating_sub(idle_timeout.as_millis() as u64);
        Ok(self
            .shared
            .activity
            .lock()
            .iter()
            .filter(|(_, last)| **last < cutoff)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn forget(&self, workspace_id: &WorkspaceId) -> Result<(), CoordError> {
        self.shared.activity.lock().remove(workspace_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
