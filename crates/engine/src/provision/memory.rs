// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use wharf_core::{codes, Warning};
use wharf_env::ContainerEnvironment;

use crate::error::RuntimeError;
use crate::provision::{ProvisionContext, Provisioner};

/// Default memory limit applied when neither the recipe nor the machine
/// attributes declare one (1 GiB).
pub const DEFAULT_MEM_LIMIT_BYTES: u64 = 1_073_741_824;

/// Applies memory limits to machine containers.
///
/// Priority: a limit already set by the recipe wins, then the machine's
/// `memoryLimitBytes` attribute, then the configured default. Only the
/// default case produces warning 4102; an explicit limit is never a
/// surprise worth reporting.
pub struct MemoryAttribute {
    pub default_bytes: u64,
}

impl Default for MemoryAttribute {
    fn default() -> Self {
        Self {
            default_bytes: DEFAULT_MEM_LIMIT_BYTES,
        }
    }
}

impl Provisioner for MemoryAttribute {
    fn name(&self) -> &'static str {
        "memory-attribute"
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut ContainerEnvironment,
    ) -> Result<(), RuntimeError> {
        let names: Vec<String> = env
            .machine_containers()
            .map(|(name, _)| name.clone())
            .collect();
        for name in names {
            let attribute_limit = ctx
                .environment
                .machines
                .get(&name)
                .and_then(|machine| machine.memory_limit_bytes());

            let mut defaulted = false;
            if let Some(container) = env.container_mut(&name) {
                if container.mem_limit_bytes.is_none() {
                    match attribute_limit {
                        Some(bytes) => container.mem_limit_bytes = Some(bytes),
                        None => {
                            container.mem_limit_bytes = Some(self.default_bytes);
                            defaulted = true;
                        }
                    }
                }
            }
            if defaulted {
                env.warn(Warning::new(
                    codes::MEMORY_LIMIT_DEFAULTED,
                    format!(
                        "machine '{name}' declared no memory limit; defaulted to {} bytes",
                        self.default_bytes
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
