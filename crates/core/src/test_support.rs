// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Shared test fixtures for other crates' tests.

use crate::config::{MachineConfig, RecipeConfig, ServerConfig, WorkspaceConfig};
use crate::identity::RuntimeIdentity;

/// Single-machine `dockerimage` config with one http server on 8080.
pub fn dockerimage_config(name: &str) -> WorkspaceConfig {
    WorkspaceConfig::new(name, RecipeConfig::inline("dockerimage", None, "alpine:3.20"))
        .with_machine(
            "dev",
            MachineConfig::new().with_server("http", ServerConfig::new(8080, "http")),
        )
}

/// Runtime identity in the `test` namespace.
pub fn identity(workspace_id: &str) -> RuntimeIdentity {
    RuntimeIdentity::new(workspace_id, "owner-1", "test", format!("{workspace_id}-a1"))
}
