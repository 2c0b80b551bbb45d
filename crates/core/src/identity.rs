// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Runtime identity: the stable key of one running workspace instance.

use crate::id::{AttemptId, OwnerId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one running workspace instance.
///
/// Created when a start request is accepted and valid until the runtime is
/// fully stopped. All distributed coordination (lock, status cache, events)
/// is keyed by the `workspace_id` component; `attempt` distinguishes
/// successive lifecycles of the same workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeIdentity {
    pub workspace_id: WorkspaceId,
    pub owner_id: OwnerId,
    /// Infrastructure namespace the runtime lives in (docker network name,
    /// kubernetes namespace, openshift project).
    pub namespace: String,
    pub attempt: AttemptId,
}

impl RuntimeIdentity {
    pub fn new(
        workspace_id: impl Into<WorkspaceId>,
        owner_id: impl Into<OwnerId>,
        namespace: impl Into<String>,
        attempt: impl Into<AttemptId>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            owner_id: owner_id.into(),
            namespace: namespace.into(),
            attempt: attempt.into(),
        }
    }
}

impl fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.namespace,
            self.workspace_id,
            self.attempt.short(8)
        )
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
