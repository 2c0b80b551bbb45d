// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_env::ContainerEnvironment;

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

pub const LABEL_WORKSPACE: &str = "org.wharf.workspace";
pub const LABEL_OWNER: &str = "org.wharf.owner";
pub const LABEL_MACHINE: &str = "org.wharf.machine";
pub const LABEL_AUXILIARY: &str = "org.wharf.auxiliary";

/// Stamps identity labels on every container and checks the final shape.
///
/// Runs last: after all other provisioners the environment must still have
/// exactly one container per declared machine. A mismatch here is a bug in
/// an earlier step and aborts the start.
pub struct RuntimeLabels;

impl Provisioner for RuntimeLabels {
    fn name(&self) -> &'static str {
        "runtime-labels"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        let declared = ctx.environment.machines.len();
        let actual = env.machine_count();
        if actual != declared {
            return Err(RuntimeError::Validation(
                wharf_env::ValidationError::InvalidConfig(format!(
                    "expected {declared} machine containers after provisioning, found {actual}"
                )),
            ));
        }

        let workspace = ctx.identity.workspace_id.to_string();
        let owner = ctx.identity.owner_id.to_string();
        let names: Vec<String> = env.containers().keys().cloned().collect();
        for name in names {
            let auxiliary = env.is_auxiliary(&name);
            if let Some(container) = env.container_mut(&name) {
                container
                    .labels
                    .insert(LABEL_WORKSPACE.to_string(), workspace.clone());
                container.labels.insert(LABEL_OWNER.to_string(), owner.clone());
                container
                    .labels
                    .insert(LABEL_MACHINE.to_string(), name.clone());
                container
                    .labels
                    .insert(LABEL_AUXILIARY.to_string(), auxiliary.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
