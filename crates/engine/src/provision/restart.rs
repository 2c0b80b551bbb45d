// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_core::{codes, Warning};
use wharf_env::{ContainerEnvironment, RestartPolicy};

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

/// Forces the environment's restart policy to the configured default.
///
/// Workspaces are supervised by the runtime engine, not by the backend;
/// a recipe asking the backend to restart containers on its own would
/// fight the status state machine. One warning 4101 per override, however
/// many containers the environment has.
pub struct RestartPolicyDefault {
    pub policy: RestartPolicy,
}

impl Default for RestartPolicyDefault {
    fn default() -> Self {
        Self {
            policy: RestartPolicy::Never,
        }
    }
}

impl Provisioner for RestartPolicyDefault {
    fn name(&self) -> &'static str {
        "restart-policy"
    }

    fn provision(
        &self,
        _ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        if env.restart_policy != self.policy {
            env.warn(Warning::new(
                codes::RESTART_POLICY_OVERRIDDEN,
                format!(
                    "restart policy '{}' overridden to '{}'",
                    env.restart_policy, self.policy
                ),
            ));
            env.restart_policy = self.policy;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
