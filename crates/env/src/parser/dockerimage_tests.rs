// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use wharf_core::ServerConfig;

fn recipe(content: &str) -> Recipe {
    Recipe {
        type_name: "dockerimage".to_string(),
        content_type: None,
        content: content.to_string(),
    }
}

#[test]
fn single_machine_single_container() {
    let mut machines = IndexMap::new();
    machines.insert(
        "dev".to_string(),
        MachineConfig::new().with_server("http", ServerConfig::new(8080, "http")),
    );

    let env = DockerimageParser.parse(&recipe("alpine:3.20"), &machines).unwrap();
    assert_eq!(env.containers().len(), 1);
    let container = env.container("dev").unwrap();
    assert_eq!(container.image.as_deref(), Some("alpine:3.20"));
    assert_eq!(container.expose, [8080]);
    assert!(env.warnings().is_empty());
}

#[test]
fn multiple_machines_rejected() {
    let mut machines = IndexMap::new();
    machines.insert("dev".to_string(), MachineConfig::new());
    machines.insert("db".to_string(), MachineConfig::new());

    let err = DockerimageParser.parse(&recipe("alpine"), &machines).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::TooManyMachines { count: 2, .. }
    ));
}

#[yare::parameterized(
    blank      = { "   " },
    whitespace = { "alpine 3.20" },
)]
fn malformed_image_rejected(content: &str) {
    let mut machines = IndexMap::new();
    machines.insert("dev".to_string(), MachineConfig::new());

    let err = DockerimageParser.parse(&recipe(content), &machines).unwrap_err();
    assert!(matches!(err, ValidationError::MalformedRecipe(_)));
}
