// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use crate::provision::ProvisionContext;
use crate::test_util::parsed;
use wharf_core::test_support::{dockerimage_config, identity};

#[test]
fn assigns_attempt_scoped_network_and_alias() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    WorkspaceNetwork.provision(&ctx, &mut env).unwrap();

    let network = env.network.clone().unwrap();
    assert!(network.starts_with("wharf-ws1-"));
    assert!(env.container("dev").unwrap().aliases.contains(&"dev".to_string()));
}

#[test]
fn respects_preassigned_network_and_does_not_duplicate_aliases() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    env.network = Some("existing".to_string());
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    WorkspaceNetwork.provision(&ctx, &mut env).unwrap();
    WorkspaceNetwork.provision(&ctx, &mut env).unwrap();

    assert_eq!(env.network.as_deref(), Some("existing"));
    let aliases = &env.container("dev").unwrap().aliases;
    assert_eq!(aliases.iter().filter(|a| *a == "dev").count(), 1);
}
