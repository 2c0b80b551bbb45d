// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Parser for `dockerfile` recipes: the content is Dockerfile text.

use super::{apply_server_ports, require_single_machine, EnvironmentParser};
use crate::container::{Container, ContainerEnvironment};
use crate::error::ValidationError;
use crate::recipe::Recipe;
use indexmap::IndexMap;
use wharf_core::MachineConfig;

pub struct DockerfileParser;

impl EnvironmentParser for DockerfileParser {
    fn recipe_types(&self) -> &'static [&'static str] {
        &["dockerfile"]
    }

    fn content_types(&self) -> &'static [&'static str] {
        &["text/x-dockerfile"]
    }

    fn parse(
        &self,
        recipe: &Recipe,
        machines: &IndexMap<String, MachineConfig>,
    ) -> Result<ContainerEnvironment, ValidationError> {
        let (name, machine) = require_single_machine("dockerfile", machines)?;

        // Minimal sanity check; full Dockerfile validation is the backend's job.
        let has_from = recipe
            .content
            .lines()
            .map(str::trim)
            .any(|l| l.to_ascii_uppercase().starts_with("FROM "));
        if !has_from {
            return Err(ValidationError::MalformedRecipe(
                "dockerfile has no FROM instruction".to_string(),
            ));
        }

        let mut container = Container::from_dockerfile(recipe.content.clone());
        apply_server_ports(&mut container, machine);

        let mut env = ContainerEnvironment::new();
        env.add_machine(name.clone(), container);
        Ok(env)
    }
}

#[cfg(test)]
#[path = "dockerfile_tests.rs"]
mod tests;
