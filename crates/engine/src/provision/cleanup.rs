// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_core::{codes, Warning};
use wharf_env::ContainerEnvironment;

use crate::error::RuntimeError;
use crate::provision::tooling::TOOLING_CONTAINER;
use crate::provision::{ProvisionContext, Provisioner};

/// Drops auxiliary containers left over from an earlier provisioning pass.
///
/// Runs first, so any auxiliary container present at this point was not
/// contributed by the current pass; it is stale tooling from an
/// interrupted or re-driven attempt. Each removal is reported with
/// warning 4103 rather than failing the start, except for the tooling
/// container a later stage deterministically re-creates; re-provisioning
/// an installer-bearing environment is not a stale resource.
pub struct StaleResourceCleanup;

impl Provisioner for StaleResourceCleanup {
    fn name(&self) -> &'static str {
        "stale-resource-cleanup"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        let has_installers = ctx
            .environment
            .machines
            .values()
            .any(|machine| !machine.installers.is_empty());
        let stale: Vec<String> = env
            .containers()
            .keys()
            .filter(|name| env.is_auxiliary(name))
            .cloned()
            .collect();
        for name in stale {
            env.remove_auxiliary(&name);
            tracing::debug!(container = %name, "removed stale auxiliary container");
            if name == TOOLING_CONTAINER && has_installers {
                continue;
            }
            env.warn(Warning::new(
                codes::STALE_RESOURCE_REMOVED,
                format!("removed stale auxiliary container '{name}'"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
