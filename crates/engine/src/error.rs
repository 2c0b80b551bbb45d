// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use thiserror::Error;
use wharf_core::{WorkspaceId, WorkspaceStatus};

/// Errors from the orchestration core.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The workspace config or recipe is invalid.
    #[error(transparent)]
    Validation(#[from] wharf_env::ValidationError),

    /// The requested operation is illegal in the workspace's current status.
    #[error("workspace '{workspace_id}' is {status}; operation not allowed")]
    Conflict {
        workspace_id: WorkspaceId,
        status: WorkspaceStatus,
    },

    /// Another node holds the workspace lock.
    #[error("workspace '{workspace_id}' is busy on another node")]
    Busy { workspace_id: WorkspaceId },

    /// The workspace has no runtime.
    #[error("workspace '{workspace_id}' has no runtime")]
    NotFound { workspace_id: WorkspaceId },

    /// The start attempt was interrupted by a stop request.
    #[error("start of workspace '{workspace_id}' was interrupted")]
    Interrupted { workspace_id: WorkspaceId },

    /// The infrastructure backend failed.
    #[error(transparent)]
    Infrastructure(#[from] wharf_infra::InfraError),

    /// The coordination backend failed.
    #[error(transparent)]
    Coordination(#[from] wharf_coord::CoordError),
}

impl RuntimeError {
    /// Map a lock-busy coordination error onto the engine's `Busy`.
    pub(crate) fn from_lock(err: wharf_coord::CoordError) -> Self {
        match err {
            wharf_coord::CoordError::LockBusy { workspace_id } => {
                RuntimeError::Busy { workspace_id }
            }
            other => RuntimeError::Coordination(other),
        }
    }
}
