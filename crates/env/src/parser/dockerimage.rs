// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Parser for `dockerimage` recipes: the content is an image reference.

use super::{apply_server_ports, require_single_machine, EnvironmentParser};
use crate::container::{Container, ContainerEnvironment};
use crate::error::ValidationError;
use crate::recipe::Recipe;
use indexmap::IndexMap;
use wharf_core::MachineConfig;

pub struct DockerimageParser;

impl EnvironmentParser for DockerimageParser {
    fn recipe_types(&self) -> &'static [&'static str] {
        &["dockerimage"]
    }

    fn content_types(&self) -> &'static [&'static str] {
        &["text/plain"]
    }

    fn parse(
        &self,
        recipe: &Recipe,
        machines: &IndexMap<String, MachineConfig>,
    ) -> Result<ContainerEnvironment, ValidationError> {
        let (name, machine) = require_single_machine("dockerimage", machines)?;

        let image = recipe.content.trim();
        if image.is_empty() || image.contains(char::is_whitespace) {
            return Err(ValidationError::MalformedRecipe(format!(
                "'{image}' is not a valid image reference"
            )));
        }

        let mut container = Container::from_image(image);
        apply_server_ports(&mut container, machine);

        let mut env = ContainerEnvironment::new();
        env.add_machine(name.clone(), container);
        Ok(env)
    }
}

#[cfg(test)]
#[path = "dockerimage_tests.rs"]
mod tests;
