// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;

#[test]
fn memory_limit_parses_attribute() {
    let machine = MachineConfig::new().with_attribute(MEMORY_LIMIT_ATTRIBUTE, "536870912");
    assert_eq!(machine.memory_limit_bytes(), Some(536_870_912));
}

#[yare::parameterized(
    absent    = { None },
    malformed = { Some("lots") },
    negative  = { Some("-1") },
)]
fn memory_limit_invalid(value: Option<&str>) {
    let mut machine = MachineConfig::new();
    if let Some(v) = value {
        machine = machine.with_attribute(MEMORY_LIMIT_ATTRIBUTE, v);
    }
    assert_eq!(machine.memory_limit_bytes(), None);
}

#[test]
fn machine_order_is_preserved() {
    let config = WorkspaceConfig::new("ws", RecipeConfig::inline("dockerimage", None, "alpine"))
        .with_machine("db", MachineConfig::new())
        .with_machine("dev", MachineConfig::new())
        .with_machine("cache", MachineConfig::new());

    let names: Vec<&str> = config.machines.keys().map(String::as_str).collect();
    assert_eq!(names, ["db", "dev", "cache"]);
}

#[test]
fn recipe_config_serde_roundtrip() {
    let recipe = RecipeConfig::inline("dockerfile", Some("text/x-dockerfile"), "FROM alpine\n");
    let json = serde_json::to_string(&recipe).unwrap();
    assert!(json.contains("\"type\":\"dockerfile\""));
    // absent location is omitted from the wire form
    assert!(!json.contains("location"));

    let parsed: RecipeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, recipe);
}

#[test]
fn server_config_with_path() {
    let server = ServerConfig::new(8080, "http").with_path("/api");
    assert_eq!(server.port, 8080);
    assert_eq!(server.path.as_deref(), Some("/api"));
}
