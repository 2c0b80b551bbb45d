// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Provisioner pipeline behavior over parsed environments.

use crate::prelude::provisioned;
use wharf_core::test_support::{dockerimage_config, identity};
use wharf_core::{codes, CancelFlag};
use wharf_engine::{default_pipeline, ProvisionContext};
use wharf_env::{EnvironmentFactory, InlineOnlyRetriever, ParserRegistry, RestartPolicy};

#[test]
fn always_restart_policy_is_rewritten_to_never_with_exactly_one_warning() {
    let config = dockerimage_config("ws1");
    let factory = EnvironmentFactory::new(InlineOnlyRetriever);
    let internal = factory.build(&config).unwrap();
    let mut env = ParserRegistry::with_defaults()
        .parse(&internal.recipe, &internal.machines)
        .unwrap();
    env.restart_policy = RestartPolicy::Always;

    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };
    default_pipeline()
        .provision(&ctx, &mut env, &CancelFlag::new())
        .unwrap();

    assert_eq!(env.restart_policy, RestartPolicy::Never);
    let overridden: Vec<_> = env
        .warnings()
        .iter()
        .filter(|w| w.code == codes::RESTART_POLICY_OVERRIDDEN)
        .collect();
    assert_eq!(overridden.len(), 1);
}

#[test]
fn missing_memory_limit_falls_back_to_the_default_with_a_warning() {
    // dockerimage_config declares no memoryLimitBytes attribute
    let (_, env) = provisioned(&dockerimage_config("ws1"));

    let dev = env.container("dev").unwrap();
    assert_eq!(dev.mem_limit_bytes, Some(1_073_741_824));
    assert!(env
        .warnings()
        .iter()
        .any(|w| w.code == codes::MEMORY_LIMIT_DEFAULTED));
}

#[test]
fn reprovisioning_is_idempotent() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = provisioned(&config);

    let before_containers: Vec<String> = env.containers().keys().cloned().collect();
    let before_warnings = env.warnings().len();
    let before_network = env.network.clone();

    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };
    default_pipeline()
        .provision(&ctx, &mut env, &CancelFlag::new())
        .unwrap();

    let after_containers: Vec<String> = env.containers().keys().cloned().collect();
    assert_eq!(before_containers, after_containers);
    assert_eq!(before_warnings, env.warnings().len());
    assert_eq!(before_network, env.network);
}

#[test]
fn reprovisioning_with_installers_recreates_tooling_without_new_warnings() {
    let config = dockerimage_config("ws1").with_machine(
        "dev",
        wharf_core::MachineConfig::new().with_installer("org.wharf/git"),
    );
    let (internal, mut env) = provisioned(&config);
    assert!(env.container("wharf-tooling").is_some());

    let before_warnings = env.warnings().len();
    let before_containers: Vec<String> = env.containers().keys().cloned().collect();

    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };
    default_pipeline()
        .provision(&ctx, &mut env, &CancelFlag::new())
        .unwrap();

    assert!(env.container("wharf-tooling").is_some());
    let after_containers: Vec<String> = env.containers().keys().cloned().collect();
    assert_eq!(before_containers, after_containers);
    assert_eq!(before_warnings, env.warnings().len());
}

#[test]
fn machine_containers_are_fully_decorated_for_launch() {
    let (_, env) = provisioned(&dockerimage_config("ws1"));

    let dev = env.container("dev").unwrap();
    assert_eq!(
        dev.labels.get("org.wharf.workspace").map(String::as_str),
        Some("ws1")
    );
    assert_eq!(
        dev.labels.get("org.wharf.auxiliary").map(String::as_str),
        Some("false")
    );
    assert!(dev.aliases.contains(&"dev".to_string()));
    assert!(dev
        .volumes
        .iter()
        .any(|v| v.mount_path == "/projects" && v.volume == "wharf-projects-ws1"));
    assert_eq!(
        dev.environment.get("WHARF_WORKSPACE_ID").map(String::as_str),
        Some("ws1")
    );
    assert!(env.network.is_some());
}
