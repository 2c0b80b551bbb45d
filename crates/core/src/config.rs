// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Declarative workspace configuration.
//!
//! `WorkspaceConfig` is the immutable input handed over by the API layer.
//! The orchestration core never mutates it; every start attempt derives a
//! fresh working copy (the internal environment) from it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Machine attribute holding the memory limit in bytes.
pub const MEMORY_LIMIT_ATTRIBUTE: &str = "memoryLimitBytes";

/// Declarative description of one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    pub recipe: RecipeConfig,
    /// Named machines; iteration order is preserved and meaningful
    /// (the first machine is the default target for tooling injection).
    pub machines: IndexMap<String, MachineConfig>,
}

impl WorkspaceConfig {
    pub fn new(name: impl Into<String>, recipe: RecipeConfig) -> Self {
        Self {
            name: name.into(),
            recipe,
            machines: IndexMap::new(),
        }
    }

    pub fn with_machine(mut self, name: impl Into<String>, machine: MachineConfig) -> Self {
        self.machines.insert(name.into(), machine);
        self
    }
}

/// Raw recipe reference: what to build the machines from.
///
/// Exactly one of `content` and `location` is expected to be set; a recipe
/// with neither is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Recipe type, e.g. `dockerimage`, `dockerfile`, `compose`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Filesystem location to fetch content from when `content` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RecipeConfig {
    /// Inline recipe with content.
    pub fn inline(
        type_name: impl Into<String>,
        content_type: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            content_type: content_type.map(str::to_string),
            content: Some(content.into()),
            location: None,
        }
    }

    /// Recipe referencing external content by location.
    pub fn located(
        type_name: impl Into<String>,
        content_type: Option<&str>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            content_type: content_type.map(str::to_string),
            content: None,
            location: Some(location.into()),
        }
    }
}

/// Declarative configuration of one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Named server declarations (port/protocol/path).
    #[serde(default)]
    pub servers: IndexMap<String, ServerConfig>,
    /// Free-form attributes, e.g. `memoryLimitBytes`.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Installer references to be injected by the tooling provisioner.
    #[serde(default)]
    pub installers: Vec<String>,
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, name: impl Into<String>, server: ServerConfig) -> Self {
        self.servers.insert(name.into(), server);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_installer(mut self, installer: impl Into<String>) -> Self {
        self.installers.push(installer.into());
        self
    }

    /// Parsed `memoryLimitBytes` attribute, `None` when absent or malformed.
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        self.attributes
            .get(MEMORY_LIMIT_ATTRIBUTE)
            .and_then(|v| v.parse().ok())
    }
}

/// One declared server on a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ServerConfig {
    pub fn new(port: u16, protocol: impl Into<String>) -> Self {
        Self {
            port,
            protocol: protocol.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
