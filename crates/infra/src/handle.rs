// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Opaque bookkeeping an adapter hands back after `create`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wharf_core::RuntimeIdentity;

/// Observable state of a single backend container or pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    /// Created but not yet running.
    Pending,
    Running,
    /// Ran and terminated.
    Exited,
    /// The backend no longer knows the resource.
    Gone,
}

/// Aggregate state of a runtime's machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    pub machines: IndexMap<String, MachineState>,
}

impl RuntimeState {
    pub fn all_running(&self) -> bool {
        !self.machines.is_empty() && self.machines.values().all(|s| *s == MachineState::Running)
    }

    pub fn any_exited(&self) -> bool {
        self.machines.values().any(|s| matches!(s, MachineState::Exited | MachineState::Gone))
    }
}

/// Handle to created backend resources for one start attempt.
///
/// `machines` maps machine names from the environment to the backend-side
/// resource names the adapter chose (container names, pod names). The handle
/// round-trips through serde so the daemon can persist it across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeHandle {
    pub identity: RuntimeIdentity,
    pub machines: IndexMap<String, String>,
    /// Backend that produced the handle ("docker", "kubernetes", "openshift").
    pub backend: String,
    /// Backend-side namespace or network the resources live in.
    pub scope: String,
}

impl RuntimeHandle {
    pub fn backend_name(&self, machine: &str) -> Option<&str> {
        self.machines.get(machine).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
