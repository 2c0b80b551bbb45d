// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use thiserror::Error;
use wharf_core::WorkspaceId;

/// Errors from the coordination backend.
#[derive(Debug, Clone, Error)]
pub enum CoordError {
    /// The backend cannot be reached. Treated as fatal by callers; the
    /// engine never guesses at cluster state.
    #[error("coordination backend unavailable: {0}")]
    Unavailable(String),
    /// The per-workspace lock is held elsewhere and the bounded wait ran out.
    #[error("workspace '{workspace_id}' is locked by another operation")]
    LockBusy { workspace_id: WorkspaceId },
}
