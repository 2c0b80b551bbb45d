// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Internal environment: the working copy of one start attempt.

use crate::error::ValidationError;
use crate::recipe::{Recipe, RecipeRetriever};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use wharf_core::{MachineConfig, Warning, WorkspaceConfig};

/// Mutable working copy derived from a `WorkspaceConfig` plus resolved
/// recipe content. One instance per runtime attempt, owned exclusively by
/// the orchestration pipeline for the duration of a start, discarded after
/// realization. Building a fresh instance resets the warning list.
#[derive(Debug, Clone)]
pub struct InternalEnvironment {
    pub recipe: Recipe,
    pub machines: IndexMap<String, MachineConfig>,
    /// Hex digest of the resolved recipe content, for logs and caching.
    pub fingerprint: String,
    warnings: Vec<Warning>,
}

impl InternalEnvironment {
    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Builds internal environments from workspace configs.
pub struct EnvironmentFactory<R> {
    retriever: R,
}

impl<R: RecipeRetriever> EnvironmentFactory<R> {
    pub fn new(retriever: R) -> Self {
        Self { retriever }
    }

    /// Resolve the recipe and machine configs into a fresh internal
    /// environment. Pure apart from retriever I/O; validation failures
    /// surface immediately.
    pub fn build(&self, config: &WorkspaceConfig) -> Result<InternalEnvironment, ValidationError> {
        if config.machines.is_empty() {
            return Err(ValidationError::NoMachines);
        }
        let recipe = Recipe::resolve(&config.recipe, &self.retriever)?;
        if recipe.content.trim().is_empty() {
            return Err(ValidationError::MalformedRecipe(
                "recipe content is empty".to_string(),
            ));
        }

        let mut hasher = Sha256::new();
        hasher.update(recipe.type_name.as_bytes());
        hasher.update(recipe.content.as_bytes());
        let fingerprint = format!("{:x}", hasher.finalize());

        tracing::debug!(
            recipe_type = %recipe.type_name,
            machines = config.machines.len(),
            fingerprint = fingerprint.get(..12).unwrap_or(&fingerprint),
            "built internal environment"
        );

        Ok(InternalEnvironment {
            recipe,
            machines: config.machines.clone(),
            fingerprint,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "internal_tests.rs"]
mod tests;
