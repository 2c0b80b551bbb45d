// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Parser for `compose` recipes: a multi-container YAML descriptor.
//!
//! Service names must match the declared machine names one-to-one; the
//! descriptor may not introduce services the config does not declare.

use super::{apply_server_ports, EnvironmentParser};
use crate::container::{Container, ContainerEnvironment, VolumeMount};
use crate::error::ValidationError;
use crate::recipe::Recipe;
use indexmap::IndexMap;
use serde::Deserialize;
use wharf_core::MachineConfig;

#[derive(Debug, Deserialize)]
struct ComposeFile {
    services: IndexMap<String, ComposeService>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComposeService {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    build: Option<ComposeBuild>,
    #[serde(default)]
    environment: IndexMap<String, String>,
    #[serde(default)]
    volumes: Vec<String>,
    #[serde(default)]
    expose: Vec<u16>,
    #[serde(default)]
    mem_limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComposeBuild {
    Context(String),
    Detailed {
        #[serde(default)]
        dockerfile: Option<String>,
    },
}

pub struct ComposeParser;

impl EnvironmentParser for ComposeParser {
    fn recipe_types(&self) -> &'static [&'static str] {
        &["compose"]
    }

    fn content_types(&self) -> &'static [&'static str] {
        &["application/x-yaml", "text/yaml"]
    }

    fn parse(
        &self,
        recipe: &Recipe,
        machines: &IndexMap<String, MachineConfig>,
    ) -> Result<ContainerEnvironment, ValidationError> {
        if machines.is_empty() {
            return Err(ValidationError::NoMachines);
        }

        let file: ComposeFile = serde_yaml_ng::from_str(&recipe.content)
            .map_err(|e| ValidationError::MalformedRecipe(e.to_string()))?;

        for machine in machines.keys() {
            if !file.services.contains_key(machine) {
                return Err(ValidationError::MachineWithoutService {
                    machine: machine.clone(),
                });
            }
        }
        for service in file.services.keys() {
            if !machines.contains_key(service) {
                return Err(ValidationError::ServiceWithoutMachine {
                    service: service.clone(),
                });
            }
        }

        let mut env = ContainerEnvironment::new();
        // iterate machines, not services, so container order follows the config
        for (name, machine) in machines {
            let service = &file.services[name];
            let mut container = service_to_container(name, service)?;
            apply_server_ports(&mut container, machine);
            env.add_machine(name.clone(), container);
        }
        Ok(env)
    }
}

fn service_to_container(
    name: &str,
    service: &ComposeService,
) -> Result<Container, ValidationError> {
    let mut container = match (&service.image, &service.build) {
        (Some(image), None) => Container::from_image(image.clone()),
        (None, Some(ComposeBuild::Detailed {
            dockerfile: Some(df),
        })) => Container::from_dockerfile(df.clone()),
        (None, Some(_)) => {
            return Err(ValidationError::MalformedRecipe(format!(
                "service '{name}': build context recipes are not supported, inline a dockerfile"
            )))
        }
        (Some(_), Some(_)) => {
            return Err(ValidationError::MalformedRecipe(format!(
                "service '{name}' declares both image and build"
            )))
        }
        (None, None) => {
            return Err(ValidationError::MalformedRecipe(format!(
                "service '{name}' declares neither image nor build"
            )))
        }
    };

    container.environment = service.environment.clone();
    container.mem_limit_bytes = service.mem_limit;
    for port in &service.expose {
        container.expose_port(*port);
    }
    for volume in &service.volumes {
        let (name, path) = volume.split_once(':').ok_or_else(|| {
            ValidationError::MalformedRecipe(format!("volume '{volume}' is not 'name:/path'"))
        })?;
        container.mount(VolumeMount::new(name, path));
    }
    Ok(container)
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
