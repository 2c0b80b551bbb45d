// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_env::ContainerEnvironment;

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

/// Assigns the workspace-scoped network and machine aliases.
///
/// Every container joins one network named after the workspace and the
/// attempt, and answers to its machine name so derived server addresses
/// (`http://<machine>:<port>`) resolve inside the environment.
pub struct WorkspaceNetwork;

impl WorkspaceNetwork {
    pub(crate) fn network_name(ctx: &ProvisionContext<'_>) -> String {
        format!(
            "wharf-{}-{}",
            ctx.identity.workspace_id,
            ctx.identity.attempt.short(8)
        )
    }
}

impl Provisioner for WorkspaceNetwork {
    fn name(&self) -> &'static str {
        "workspace-network"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        if env.network.is_none() {
            env.network = Some(Self::network_name(ctx));
        }

        let names: Vec<String> = env.containers().keys().cloned().collect();
        for name in names {
            if let Some(container) = env.container_mut(&name) {
                if !container.aliases.contains(&name) {
                    container.aliases.push(name.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
