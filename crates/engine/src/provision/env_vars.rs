// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_env::ContainerEnvironment;

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

/// Injects runtime env vars into every machine container.
///
/// Each machine learns its own name, the workspace id, and a URL for every
/// server declared on any machine of the environment, addressed through the
/// machine's network alias.
pub struct EnvVars;

impl Provisioner for EnvVars {
    fn name(&self) -> &'static str {
        "env-vars"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        // server URLs are derived from the declared machine configs, not
        // from the containers, so auxiliary containers contribute none
        let mut server_vars: Vec<(String, String)> = Vec::new();
        for (machine, config) in &ctx.environment.machines {
            for (server, decl) in &config.servers {
                let key = format!(
                    "WHARF_SERVER_{}_URL",
                    server.to_ascii_uppercase().replace('-', "_")
                );
                let path = decl.path.as_deref().unwrap_or("");
                let value = format!("{}://{machine}:{}{path}", decl.protocol, decl.port);
                server_vars.push((key, value));
            }
        }

        let workspace_id = ctx.identity.workspace_id.to_string();
        let machine_names: Vec<String> = env
            .machine_containers()
            .map(|(name, _)| name.clone())
            .collect();
        for name in machine_names {
            if let Some(container) = env.container_mut(&name) {
                container
                    .environment
                    .insert("WHARF_WORKSPACE_ID".to_string(), workspace_id.clone());
                container
                    .environment
                    .insert("WHARF_MACHINE_NAME".to_string(), name.clone());
                for (key, value) in &server_vars {
                    container.environment.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "env_vars_tests.rs"]
mod tests;
