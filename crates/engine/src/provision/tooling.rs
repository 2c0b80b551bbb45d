// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_env::{Container, ContainerEnvironment, VolumeMount};

use crate::error::RuntimeError;
use crate::provision::volume::{ProjectVolume, PROJECTS_MOUNT_PATH};
use crate::provision::{ProvisionContext, Provisioner};

/// Name of the auxiliary container carrying installer tooling.
pub const TOOLING_CONTAINER: &str = "wharf-tooling";

/// Image the tooling container runs.
pub const TOOLING_IMAGE: &str = "wharf/tooling:1";

/// Adds the auxiliary tooling container when any machine declares installers.
///
/// The tooling container shares the project volume and receives the full
/// installer list; it never counts as a machine. Environments without
/// installers get no extra container.
pub struct InstallerTooling;

impl Provisioner for InstallerTooling {
    fn name(&self) -> &'static str {
        "installer-tooling"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        let installers: Vec<String> = ctx
            .environment
            .machines
            .values()
            .flat_map(|machine| machine.installers.iter().cloned())
            .collect();
        if installers.is_empty() {
            return Ok(());
        }

        let mut container = Container::from_image(TOOLING_IMAGE);
        container
            .environment
            .insert("WHARF_INSTALLERS".to_string(), installers.join(","));
        container.mount(VolumeMount::new(
            ProjectVolume::volume_name(ctx),
            PROJECTS_MOUNT_PATH,
        ));
        env.add_auxiliary(TOOLING_CONTAINER, container);
        tracing::debug!(installers = installers.len(), "tooling container added");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tooling_tests.rs"]
mod tests;
