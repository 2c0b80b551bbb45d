// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Shared fixtures for engine tests.

use wharf_core::WorkspaceConfig;
use wharf_env::{
    ContainerEnvironment, EnvironmentFactory, InlineOnlyRetriever, InternalEnvironment,
    ParserRegistry,
};

/// Parse a config through the real factory and registry.
pub fn parsed(config: &WorkspaceConfig) -> (InternalEnvironment, ContainerEnvironment) {
    let internal = EnvironmentFactory::new(InlineOnlyRetriever)
        .build(config)
        .unwrap();
    let env = ParserRegistry::with_defaults()
        .parse(&internal.recipe, &internal.machines)
        .unwrap();
    (internal, env)
}
