// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Environment parsing: recipe to container environment.

use crate::prelude::provisioned;
use wharf_core::{
    MachineConfig, RecipeConfig, ServerConfig, WorkspaceConfig, MEMORY_LIMIT_ATTRIBUTE,
};
use wharf_env::{EnvironmentFactory, InlineOnlyRetriever, ParserRegistry, ValidationError};

#[test]
fn dockerimage_machine_gets_its_port_and_memory_limit_without_warnings() {
    let config = WorkspaceConfig::new(
        "ws1",
        RecipeConfig::inline("dockerimage", None, "alpine:3.20"),
    )
    .with_machine(
        "dev",
        MachineConfig::new()
            .with_server("http", ServerConfig::new(8080, "http"))
            .with_attribute(MEMORY_LIMIT_ATTRIBUTE, "536870912"),
    );

    let (internal, env) = provisioned(&config);

    let dev = env.container("dev").unwrap();
    assert_eq!(dev.image.as_deref(), Some("alpine:3.20"));
    assert_eq!(dev.expose, vec![8080]);
    assert_eq!(dev.mem_limit_bytes, Some(536_870_912));
    assert!(internal.warnings().is_empty());
    assert!(env.warnings().is_empty());
}

#[test]
fn unsupported_recipe_type_is_named_in_the_error() {
    let config = WorkspaceConfig::new("ws1", RecipeConfig::inline("helm", None, "chart"))
        .with_machine("dev", MachineConfig::new());

    let factory = EnvironmentFactory::new(InlineOnlyRetriever);
    let internal = factory.build(&config).unwrap();
    let err = ParserRegistry::with_defaults()
        .parse(&internal.recipe, &internal.machines)
        .unwrap_err();

    assert!(matches!(err, ValidationError::UnsupportedRecipeType(ref t) if t == "helm"));
    assert!(err.to_string().contains("helm"));
}

#[test]
fn dockerfile_recipe_carries_its_content_into_the_container() {
    let config = WorkspaceConfig::new(
        "ws1",
        RecipeConfig::inline("dockerfile", Some("text/x-dockerfile"), "FROM alpine:3.20\n"),
    )
    .with_machine("dev", MachineConfig::new());

    let (_, env) = provisioned(&config);

    let dev = env.container("dev").unwrap();
    assert!(dev.image.is_none());
    assert_eq!(dev.dockerfile.as_deref(), Some("FROM alpine:3.20\n"));
}
