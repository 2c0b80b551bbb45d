// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_env::{ContainerEnvironment, VolumeMount};

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

/// Where project sources are mounted in every machine.
pub const PROJECTS_MOUNT_PATH: &str = "/projects";

/// Mounts the shared project volume into every machine container.
///
/// The volume is workspace-scoped (not attempt-scoped) so project sources
/// survive restarts. `Container::mount` deduplicates, which keeps the step
/// idempotent.
pub struct ProjectVolume;

impl ProjectVolume {
    pub(crate) fn volume_name(ctx: &ProvisionContext<'_>) -> String {
        format!("wharf-projects-{}", ctx.identity.workspace_id)
    }
}

impl Provisioner for ProjectVolume {
    fn name(&self) -> &'static str {
        "project-volume"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        let volume = Self::volume_name(ctx);
        let names: Vec<String> = env
            .machine_containers()
            .map(|(name, _)| name.clone())
            .collect();
        for name in names {
            if let Some(container) = env.container_mut(&name) {
                container.mount(VolumeMount::new(volume.clone(), PROJECTS_MOUNT_PATH));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "volume_tests.rs"]
mod tests;
