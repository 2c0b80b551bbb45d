// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Events emitted by the orchestration core.
//!
//! Serializes with `{"type": "runtime:...", ...fields}` tags. Every status
//! transition publishes a `StatusChanged` before the call that triggered it
//! returns; `Stopping` transitions additionally serve as the early warning
//! that lets a racing start attempt abort itself.

use crate::id::{NodeId, WorkspaceId};
use crate::identity::RuntimeIdentity;
use crate::status::WorkspaceStatus;
use serde::{Deserialize, Serialize};

/// Events published to the workspace-keyed topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A status transition happened.
    #[serde(rename = "runtime:status")]
    StatusChanged {
        workspace_id: WorkspaceId,
        old: WorkspaceStatus,
        new: WorkspaceStatus,
        epoch_ms: u64,
        /// Human-readable cause, e.g. "idle timeout exceeded".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        /// Set when the transition was forced by a failure.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A node asked a peer to interrupt an in-flight start.
    ///
    /// Peers never act on this event directly; it mirrors the `Stopping`
    /// entry written to the shared cache, which is the ground truth.
    #[serde(rename = "runtime:stopping_intent")]
    StoppingIntent {
        workspace_id: WorkspaceId,
        requested_by: NodeId,
        epoch_ms: u64,
    },

    /// An existing runtime was re-attached during node startup.
    #[serde(rename = "runtime:recovered")]
    RuntimeRecovered {
        identity: RuntimeIdentity,
        epoch_ms: u64,
    },

    /// Activity was recorded against a workspace (post-coalescing).
    #[serde(rename = "activity:recorded")]
    ActivityRecorded {
        workspace_id: WorkspaceId,
        epoch_ms: u64,
    },
}

impl Event {
    /// Workspace the event concerns (the topic key).
    pub fn workspace_id(&self) -> &WorkspaceId {
        match self {
            Event::StatusChanged { workspace_id, .. } => workspace_id,
            Event::StoppingIntent { workspace_id, .. } => workspace_id,
            Event::RuntimeRecovered { identity, .. } => &identity.workspace_id,
            Event::ActivityRecorded { workspace_id, .. } => workspace_id,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StatusChanged { .. } => "runtime:status",
            Event::StoppingIntent { .. } => "runtime:stopping_intent",
            Event::RuntimeRecovered { .. } => "runtime:recovered",
            Event::ActivityRecorded { .. } => "activity:recorded",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
