// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Neutral container environment.
//!
//! The infrastructure-specific mutable structure the provisioner pipeline
//! edits in place. Invariant: every machine of the internal environment has
//! exactly one container entry here; provisioners may add auxiliary
//! containers (tooling, brokers) but must not remove user-declared ones.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use wharf_core::Warning;

/// Restart policy applied to every container of the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    #[default]
    Never,
    OnFailure,
    Always,
}

impl RestartPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "never" | "no" => Some(RestartPolicy::Never),
            "on-failure" | "onfailure" => Some(RestartPolicy::OnFailure),
            "always" => Some(RestartPolicy::Always),
            _ => None,
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::Never => write!(f, "never"),
            RestartPolicy::OnFailure => write!(f, "on-failure"),
            RestartPolicy::Always => write!(f, "always"),
        }
    }
}

/// A named volume mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub volume: String,
    pub mount_path: String,
}

impl VolumeMount {
    pub fn new(volume: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            mount_path: mount_path.into(),
        }
    }
}

/// One container definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Image reference; `None` when built from a dockerfile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Dockerfile content to build from; mutually exclusive with `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub environment: IndexMap<String, String>,
    #[serde(default)]
    pub volumes: Vec<VolumeMount>,
    #[serde(default)]
    pub expose: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit_bytes: Option<u64>,
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    /// Network aliases this container answers to.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Container {
    pub fn from_image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Self::default()
        }
    }

    pub fn from_dockerfile(content: impl Into<String>) -> Self {
        Self {
            dockerfile: Some(content.into()),
            ..Self::default()
        }
    }

    /// Add an exposed port unless already present.
    pub fn expose_port(&mut self, port: u16) {
        if !self.expose.contains(&port) {
            self.expose.push(port);
        }
    }

    /// Mount a volume unless an identical mount is already present.
    pub fn mount(&mut self, mount: VolumeMount) {
        if !self.volumes.contains(&mount) {
            self.volumes.push(mount);
        }
    }
}

/// The environment realized by an infrastructure adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEnvironment {
    /// Containers in creation order; machine containers come first.
    containers: IndexMap<String, Container>,
    /// Names of containers added by provisioners rather than the user.
    auxiliary: BTreeSet<String>,
    pub restart_policy: RestartPolicy,
    /// Workspace-scoped network all containers join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    warnings: Vec<Warning>,
}

impl ContainerEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the container backing a declared machine.
    pub fn add_machine(&mut self, name: impl Into<String>, container: Container) {
        self.containers.insert(name.into(), container);
    }

    /// Add a provisioner-contributed auxiliary container.
    pub fn add_auxiliary(&mut self, name: impl Into<String>, container: Container) {
        let name = name.into();
        self.auxiliary.insert(name.clone());
        self.containers.insert(name, container);
    }

    /// Remove an auxiliary container. User-declared machines cannot be
    /// removed; attempts are ignored and reported via the return value.
    pub fn remove_auxiliary(&mut self, name: &str) -> bool {
        if self.auxiliary.remove(name) {
            self.containers.shift_remove(name);
            true
        } else {
            false
        }
    }

    pub fn containers(&self) -> &IndexMap<String, Container> {
        &self.containers
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    pub fn container_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.get_mut(name)
    }

    pub fn is_auxiliary(&self, name: &str) -> bool {
        self.auxiliary.contains(name)
    }

    /// Containers backing user-declared machines, in declaration order.
    pub fn machine_containers(&self) -> impl Iterator<Item = (&String, &Container)> {
        self.containers
            .iter()
            .filter(|(name, _)| !self.auxiliary.contains(name.as_str()))
    }

    pub fn machine_count(&self) -> usize {
        self.containers.len() - self.auxiliary.len()
    }

    /// Append a warning. Warnings are never removed.
    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
