// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;

const TWO_SERVICE_YAML: &str = "\
services:
  dev:
    image: alpine:3.20
    environment:
      TERM: xterm
    volumes:
      - projects:/projects
    expose:
      - 4401
    mem_limit: 536870912
  db:
    image: postgres:16
";

fn recipe(content: &str) -> Recipe {
    Recipe {
        type_name: "compose".to_string(),
        content_type: Some("application/x-yaml".to_string()),
        content: content.to_string(),
    }
}

fn machines(names: &[&str]) -> IndexMap<String, MachineConfig> {
    names
        .iter()
        .map(|n| (n.to_string(), MachineConfig::new()))
        .collect()
}

#[test]
fn parses_multi_service_descriptor() {
    let env = ComposeParser
        .parse(&recipe(TWO_SERVICE_YAML), &machines(&["dev", "db"]))
        .unwrap();

    assert_eq!(env.containers().len(), 2);
    let dev = env.container("dev").unwrap();
    assert_eq!(dev.image.as_deref(), Some("alpine:3.20"));
    assert_eq!(dev.environment.get("TERM").map(String::as_str), Some("xterm"));
    assert_eq!(dev.mem_limit_bytes, Some(536_870_912));
    assert_eq!(dev.expose, [4401]);
    assert_eq!(dev.volumes[0], VolumeMount::new("projects", "/projects"));
}

#[test]
fn container_order_follows_config() {
    let env = ComposeParser
        .parse(&recipe(TWO_SERVICE_YAML), &machines(&["db", "dev"]))
        .unwrap();
    let order: Vec<&str> = env.containers().keys().map(String::as_str).collect();
    assert_eq!(order, ["db", "dev"]);
}

#[test]
fn machine_without_service_rejected() {
    let err = ComposeParser
        .parse(&recipe(TWO_SERVICE_YAML), &machines(&["dev", "db", "cache"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::MachineWithoutService { machine } if machine == "cache"
    ));
}

#[test]
fn service_without_machine_rejected() {
    let err = ComposeParser
        .parse(&recipe(TWO_SERVICE_YAML), &machines(&["dev"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ServiceWithoutMachine { service } if service == "db"
    ));
}

#[yare::parameterized(
    not_yaml        = { "{{" },
    both_sources    = { "services:\n  dev:\n    image: a\n    build: ./ctx\n" },
    neither_source  = { "services:\n  dev: {}\n" },
    bad_volume      = { "services:\n  dev:\n    image: a\n    volumes:\n      - projects\n" },
)]
fn malformed_descriptors_rejected(content: &str) {
    let err = ComposeParser
        .parse(&recipe(content), &machines(&["dev"]))
        .unwrap_err();
    assert!(matches!(err, ValidationError::MalformedRecipe(_)));
}
