// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use crate::provision::ProvisionContext;
use crate::test_util::parsed;
use wharf_core::test_support::{dockerimage_config, identity};
use wharf_env::Container;

#[test]
fn injects_identity_and_server_urls() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    EnvVars.provision(&ctx, &mut env).unwrap();

    let vars = &env.container("dev").unwrap().environment;
    assert_eq!(vars.get("WHARF_WORKSPACE_ID").map(String::as_str), Some("ws1"));
    assert_eq!(vars.get("WHARF_MACHINE_NAME").map(String::as_str), Some("dev"));
    assert_eq!(
        vars.get("WHARF_SERVER_HTTP_URL").map(String::as_str),
        Some("http://dev:8080")
    );
}

#[test]
fn auxiliary_containers_are_skipped() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    env.add_auxiliary("wharf-tooling", Container::from_image("wharf/tooling:1"));
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    EnvVars.provision(&ctx, &mut env).unwrap();

    assert!(env
        .container("wharf-tooling")
        .unwrap()
        .environment
        .get("WHARF_WORKSPACE_ID")
        .is_none());
}
