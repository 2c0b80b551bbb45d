// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Validation errors for recipes and environments.
//!
//! These are never retried: a validation failure means the configuration or
//! recipe is bad and the caller is told immediately.

use thiserror::Error;

/// Errors raised while resolving recipes or parsing environments.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no environment parser registered for recipe type '{0}'")]
    UnsupportedRecipeType(String),
    #[error("recipe type '{type_name}' does not support content type '{content_type}'")]
    UnsupportedContentType {
        type_name: String,
        content_type: String,
    },
    #[error("recipe type '{type_name}' allows a single machine, config declares {count}")]
    TooManyMachines { type_name: String, count: usize },
    #[error("workspace config declares no machines")]
    NoMachines,
    #[error("machine '{machine}' has no matching service in the recipe")]
    MachineWithoutService { machine: String },
    #[error("recipe service '{service}' has no matching machine in the config")]
    ServiceWithoutMachine { service: String },
    #[error("recipe has neither content nor location")]
    EmptyRecipe,
    #[error("recipe content could not be fetched from '{location}': {reason}")]
    RecipeUnavailable { location: String, reason: String },
    #[error("malformed recipe: {0}")]
    MalformedRecipe(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
