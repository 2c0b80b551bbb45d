// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use crate::provision::ProvisionContext;
use crate::test_util::parsed;
use wharf_core::test_support::{dockerimage_config, identity};

#[test]
fn override_produces_exactly_one_warning() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    env.restart_policy = RestartPolicy::Always;
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    RestartPolicyDefault::default()
        .provision(&ctx, &mut env)
        .unwrap();

    assert_eq!(env.restart_policy, RestartPolicy::Never);
    assert_eq!(env.warnings().len(), 1);
    assert_eq!(env.warnings()[0].code, codes::RESTART_POLICY_OVERRIDDEN);
}

#[test]
fn matching_policy_is_silent() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    RestartPolicyDefault::default()
        .provision(&ctx, &mut env)
        .unwrap();

    assert!(env.warnings().is_empty());
}
