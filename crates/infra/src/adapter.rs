// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Backend seam between the runtime engine and container infrastructure.

use async_trait::async_trait;
use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::ContainerEnvironment;

use crate::error::InfraError;
use crate::handle::{RuntimeHandle, RuntimeState};

/// One container backend (Docker engine, Kubernetes cluster, ...).
///
/// Adapters own retry of transient backend failures internally; callers see
/// either success, a fatal error, or `InfraError::Interrupted` when the
/// cancel flag tripped mid-operation. All operations are idempotent enough
/// to be re-driven after a crash: `destroy` on missing resources succeeds.
#[async_trait]
pub trait InfraAdapter: Clone + Send + Sync + 'static {
    /// Allocate backend resources for every machine in the environment
    /// without starting them. Returns the handle used by all later calls.
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError>;

    /// Start every machine named by the handle. Checks `cancel` between
    /// machines and returns `Interrupted` without starting the rest.
    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError>;

    /// Stop running machines. Missing machines are not an error.
    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError>;

    /// Remove all backend resources tied to the handle, including the
    /// runtime's network scope. Safe to call on partially created runtimes.
    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError>;

    /// Observe the current state of every machine in the handle.
    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError>;

    /// Handles for runtimes this backend still holds resources for,
    /// rebuilt from backend labels with their full machine maps so that
    /// `stop` and `destroy` work on them. Drives recovery after a restart.
    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError>;
}
