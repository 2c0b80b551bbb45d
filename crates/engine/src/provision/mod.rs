// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Provisioner pipeline.
//!
//! Provisioners run strictly in registration order and edit the container
//! environment in place. Each one is idempotent: re-running the pipeline on
//! an already-provisioned environment yields the same result. Recoverable
//! issues append warnings to the environment; anything fatal aborts the
//! start with no partial realization (nothing has touched the backend yet).

mod cleanup;
mod env_vars;
mod labels;
mod memory;
mod network;
mod restart;
mod tooling;
mod volume;

pub use cleanup::StaleResourceCleanup;
pub use env_vars::EnvVars;
pub use labels::RuntimeLabels;
pub use memory::MemoryAttribute;
pub use network::WorkspaceNetwork;
pub use restart::RestartPolicyDefault;
pub use tooling::InstallerTooling;
pub use volume::ProjectVolume;

use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::{ContainerEnvironment, InternalEnvironment};

use crate::error::RuntimeError;

/// Read-only inputs shared by every provisioner of one start attempt.
pub struct ProvisionContext<'a> {
    pub identity: &'a RuntimeIdentity,
    pub environment: &'a InternalEnvironment,
}

/// One pipeline step.
pub trait Provisioner: Send + Sync {
    fn name(&self) -> &'static str;

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError>;
}

/// Ordered sequence of provisioners; order is the contract.
#[derive(Default)]
pub struct ProvisionerPipeline {
    steps: Vec<Box<dyn Provisioner>>,
}

impl ProvisionerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<P: Provisioner + 'static>(&mut self, step: P) {
        self.steps.push(Box::new(step));
    }

    pub fn with<P: Provisioner + 'static>(mut self, step: P) -> Self {
        self.push(step);
        self
    }

    /// Run every step, checking the cancel flag in between.
    pub fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
        cancel: &CancelFlag,
    ) -> Result<(), RuntimeError> {
        for step in &self.steps {
            if cancel.is_cancelled() {
                return Err(RuntimeError::Interrupted {
                    workspace_id: ctx.identity.workspace_id.clone(),
                });
            }
            step.provision(ctx, env)?;
            tracing::trace!(step = step.name(), "provisioner applied");
        }
        tracing::debug!(
            runtime = %ctx.identity,
            containers = env.containers().len(),
            warnings = env.warnings().len(),
            "environment provisioned"
        );
        Ok(())
    }
}

/// The default pipeline, in contract order.
pub fn default_pipeline() -> ProvisionerPipeline {
    ProvisionerPipeline::new()
        .with(StaleResourceCleanup)
        .with(WorkspaceNetwork)
        .with(EnvVars)
        .with(ProjectVolume)
        .with(MemoryAttribute::default())
        .with(InstallerTooling)
        .with(RestartPolicyDefault::default())
        .with(RuntimeLabels)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
