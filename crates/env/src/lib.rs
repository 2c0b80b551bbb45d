// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wharf-env: recipes, environment parsers, and environment models.
//!
//! Turns a raw recipe (image reference, Dockerfile content, or
//! multi-container descriptor) into the neutral container environment that
//! the provisioner pipeline mutates and infrastructure adapters realize.

mod container;
mod error;
mod internal;
pub mod parser;
mod recipe;

pub use container::{Container, ContainerEnvironment, RestartPolicy, VolumeMount};
pub use error::ValidationError;
pub use internal::{EnvironmentFactory, InternalEnvironment};
pub use parser::{
    ComposeParser, DockerfileParser, DockerimageParser, EnvironmentParser, ParserRegistry,
};
pub use recipe::{FileRetriever, InlineOnlyRetriever, Recipe, RecipeRetriever};
