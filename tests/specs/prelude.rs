// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Shared helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::time::Duration;

use wharf_coord::MemoryCoordinator;
use wharf_core::{
    CancelFlag, NodeId, OwnerId, SystemClock, WorkspaceConfig, WorkspaceId, WorkspaceStatus,
};
use wharf_engine::{default_pipeline, ProvisionContext, Runtimes, RuntimesConfig};
use wharf_env::{
    ContainerEnvironment, EnvironmentFactory, InlineOnlyRetriever, InternalEnvironment,
    ParserRegistry,
};
use wharf_infra::FakeInfraAdapter;

pub type SpecRuntimes = Runtimes<FakeInfraAdapter, MemoryCoordinator, InlineOnlyRetriever>;

/// One orchestrator node against the shared fake backend and coordinator.
pub fn node(fake: &FakeInfraAdapter, coord: &MemoryCoordinator, name: &str) -> SpecRuntimes {
    Runtimes::new(
        fake.clone(),
        coord.clone(),
        InlineOnlyRetriever,
        SystemClock,
        RuntimesConfig {
            node: NodeId::from(name),
            namespace: "test".to_string(),
            lock_wait: Duration::from_millis(100),
            start_poll: Duration::from_millis(5),
            start_timeout: Duration::from_secs(2),
        },
    )
}

pub fn owner() -> OwnerId {
    OwnerId::from("owner-1")
}

pub async fn wait_for_status(rt: &SpecRuntimes, ws: &WorkspaceId, want: WorkspaceStatus) {
    for _ in 0..400 {
        if rt.status(ws).await.unwrap() == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("workspace '{ws}' never reached {want}");
}

/// Parse a workspace config and run the full provisioner pipeline over it,
/// the same path a start attempt takes before touching the backend.
pub fn provisioned(
    config: &WorkspaceConfig,
) -> (InternalEnvironment, ContainerEnvironment) {
    let factory = EnvironmentFactory::new(InlineOnlyRetriever);
    let internal = factory.build(config).unwrap();
    let mut env = ParserRegistry::with_defaults()
        .parse(&internal.recipe, &internal.machines)
        .unwrap();
    let identity = wharf_core::test_support::identity(&config.name);
    let ctx = ProvisionContext {
        identity: &identity,
        environment: &internal,
    };
    default_pipeline()
        .provision(&ctx, &mut env, &CancelFlag::new())
        .unwrap();
    (internal, env)
}
