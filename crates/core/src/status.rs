// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Workspace runtime status state machine.
//!
//! `Stopped` is the initial state and the only terminal one; a stopped
//! workspace re-enters `Starting` only through a fresh start request with a
//! new attempt id. The `Starting -> Stopping` edge exists for interruption:
//! a stop arriving while a start is in flight pre-empts it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a workspace runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
    /// No runtime exists (initial and terminal)
    #[default]
    Stopped,
    /// Start accepted, environment being provisioned and realized
    Starting,
    /// All machines up
    Running,
    /// Stop in progress (also the interrupt signal for in-flight starts)
    Stopping,
}

impl WorkspaceStatus {
    /// True when a runtime exists in some form.
    pub fn is_active(self) -> bool {
        !matches!(self, WorkspaceStatus::Stopped)
    }

    /// True for the states a stop request is accepted in.
    pub fn can_stop(self) -> bool {
        self.can_transition_to(WorkspaceStatus::Stopping)
    }

    /// Legal transition table.
    ///
    /// `Starting -> Stopped` covers failed and interrupted starts; a failed
    /// lifecycle never parks in an intermediate state.
    pub fn can_transition_to(self, next: WorkspaceStatus) -> bool {
        use WorkspaceStatus::*;
        matches!(
            (self, next),
            (Stopped, Starting)
                | (Starting, Running)
                | (Starting, Stopping)
                | (Starting, Stopped)
                | (Running, Stopping)
                | (Stopping, Stopped)
        )
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceStatus::Stopped => write!(f, "stopped"),
            WorkspaceStatus::Starting => write!(f, "starting"),
            WorkspaceStatus::Running => write!(f, "running"),
            WorkspaceStatus::Stopping => write!(f, "stopping"),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
