// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use crate::fake::{FakeInfraAdapter, InfraCall};
use wharf_env::Container;

fn ident(ws: &str) -> RuntimeIdentity {
    RuntimeIdentity::new(ws, "owner1", "test", "attempt1")
}

fn env() -> ContainerEnvironment {
    let mut env = ContainerEnvironment::new();
    env.add_machine("dev", Container::from_image("alpine:3.20"));
    env
}

#[tokio::test]
async fn delegates_full_lifecycle() {
    let fake = FakeInfraAdapter::new();
    let traced = TracedInfra::new(fake.clone());
    let identity = ident("ws1");

    let handle = traced.create(&env(), &identity).await.unwrap();
    traced.start(&handle, &CancelFlag::new()).await.unwrap();
    assert!(traced.status(&handle).await.unwrap().all_running());
    traced.stop(&handle).await.unwrap();
    traced.destroy(&handle).await.unwrap();
    assert!(traced.list_runtimes().await.unwrap().is_empty());

    let ws = identity.workspace_id;
    assert_eq!(
        fake.calls(),
        vec![
            InfraCall::Create(ws.clone()),
            InfraCall::Start(ws.clone()),
            InfraCall::Status(ws.clone()),
            InfraCall::Stop(ws.clone()),
            InfraCall::Destroy(ws),
            InfraCall::ListRuntimes,
        ]
    );
}

#[tokio::test]
async fn errors_pass_through_unchanged() {
    let fake = FakeInfraAdapter::new();
    fake.fail_next_create(InfraError::Fatal("quota exceeded".into()));
    let traced = TracedInfra::new(fake);

    let result = traced.create(&env(), &ident("ws1")).await;
    match result {
        Err(InfraError::Fatal(msg)) => assert_eq!(msg, "quota exceeded"),
        other => panic!("expected fatal, got {other:?}"),
    }
}
