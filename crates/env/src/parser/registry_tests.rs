// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;

fn machines() -> IndexMap<String, MachineConfig> {
    let mut map = IndexMap::new();
    map.insert("dev".to_string(), MachineConfig::new());
    map
}

fn recipe(type_name: &str, content_type: Option<&str>, content: &str) -> Recipe {
    Recipe {
        type_name: type_name.to_string(),
        content_type: content_type.map(str::to_string),
        content: content.to_string(),
    }
}

#[test]
fn dispatches_by_exact_type() {
    let registry = ParserRegistry::with_defaults();

    let env = registry
        .parse(&recipe("dockerimage", None, "alpine:3.20"), &machines())
        .unwrap();
    assert_eq!(env.container("dev").unwrap().image.as_deref(), Some("alpine:3.20"));

    let env = registry
        .parse(
            &recipe("dockerfile", Some("text/x-dockerfile"), "FROM alpine\n"),
            &machines(),
        )
        .unwrap();
    assert!(env.container("dev").unwrap().dockerfile.is_some());
}

#[test]
fn unknown_type_names_the_offender() {
    let registry = ParserRegistry::with_defaults();
    let err = registry
        .parse(&recipe("oci-bundle", None, "whatever"), &machines())
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::UnsupportedRecipeType(t) if t == "oci-bundle"
    ));
}

#[test]
fn wrong_content_type_rejected() {
    let registry = ParserRegistry::with_defaults();
    let err = registry
        .parse(
            &recipe("dockerfile", Some("application/json"), "FROM alpine\n"),
            &machines(),
        )
        .unwrap_err();
    assert!(matches!(err, ValidationError::UnsupportedContentType { .. }));
}

#[test]
fn omitted_content_type_accepted() {
    let registry = ParserRegistry::with_defaults();
    assert!(registry
        .parse(&recipe("dockerfile", None, "FROM alpine\n"), &machines())
        .is_ok());
}

#[test]
fn parse_is_pure() {
    let registry = ParserRegistry::with_defaults();
    let input = recipe("dockerimage", None, "alpine:3.20");
    let first = registry.parse(&input, &machines()).unwrap();
    let second = registry.parse(&input, &machines()).unwrap();
    assert_eq!(first, second);
}
