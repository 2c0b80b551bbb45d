// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Environment parsers.
//!
//! One parser per recipe type; dispatch is by exact string match on the
//! recipe `type`. Parsing is pure given its inputs: a parser returns a
//! fresh `ContainerEnvironment` and has no other side effects.

mod compose;
mod dockerfile;
mod dockerimage;

pub use compose::ComposeParser;
pub use dockerfile::DockerfileParser;
pub use dockerimage::DockerimageParser;

use crate::container::{Container, ContainerEnvironment};
use crate::error::ValidationError;
use crate::recipe::Recipe;
use indexmap::IndexMap;
use wharf_core::MachineConfig;

/// Turns a resolved recipe plus machine configs into a container environment.
pub trait EnvironmentParser: Send + Sync {
    /// Recipe types this parser accepts (exact match).
    fn recipe_types(&self) -> &'static [&'static str];

    /// Content types this parser accepts. An empty slice means the recipe
    /// must not declare a content type.
    fn content_types(&self) -> &'static [&'static str];

    fn parse(
        &self,
        recipe: &Recipe,
        machines: &IndexMap<String, MachineConfig>,
    ) -> Result<ContainerEnvironment, ValidationError>;
}

/// Ordered parser registry; first parser claiming a recipe type wins.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn EnvironmentParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DockerimageParser);
        registry.register(DockerfileParser);
        registry.register(ComposeParser);
        registry
    }

    pub fn register<P: EnvironmentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Dispatch to the parser registered for the recipe type.
    pub fn parse(
        &self,
        recipe: &Recipe,
        machines: &IndexMap<String, MachineConfig>,
    ) -> Result<ContainerEnvironment, ValidationError> {
        let parser = self
            .parsers
            .iter()
            .find(|p| p.recipe_types().contains(&recipe.type_name.as_str()))
            .ok_or_else(|| ValidationError::UnsupportedRecipeType(recipe.type_name.clone()))?;

        check_content_type(parser.as_ref(), recipe)?;
        parser.parse(recipe, machines)
    }
}

fn check_content_type(
    parser: &dyn EnvironmentParser,
    recipe: &Recipe,
) -> Result<(), ValidationError> {
    let supported = parser.content_types();
    match &recipe.content_type {
        None if supported.is_empty() => Ok(()),
        // a recipe may omit the content type even when the parser accepts one
        None => Ok(()),
        Some(ct) if supported.contains(&ct.as_str()) => Ok(()),
        Some(ct) => Err(ValidationError::UnsupportedContentType {
            type_name: recipe.type_name.clone(),
            content_type: ct.clone(),
        }),
    }
}

/// Reject configs with more than one machine (single-image recipe types).
pub(crate) fn require_single_machine<'m>(
    type_name: &str,
    machines: &'m IndexMap<String, MachineConfig>,
) -> Result<(&'m String, &'m MachineConfig), ValidationError> {
    if machines.is_empty() {
        return Err(ValidationError::NoMachines);
    }
    if machines.len() > 1 {
        return Err(ValidationError::TooManyMachines {
            type_name: type_name.to_string(),
            count: machines.len(),
        });
    }
    // len == 1 checked above
    machines.iter().next().ok_or(ValidationError::NoMachines)
}

/// Expose every declared server port on the machine's container.
pub(crate) fn apply_server_ports(container: &mut Container, machine: &MachineConfig) {
    for server in machine.servers.values() {
        container.expose_port(server.port);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
