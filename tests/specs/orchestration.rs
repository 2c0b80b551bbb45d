// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Multi-node orchestration through the shared coordinator.

use std::time::Duration;

use crate::prelude::{node, owner, wait_for_status};
use wharf_coord::MemoryCoordinator;
use wharf_core::test_support::dockerimage_config;
use wharf_core::{Event, WorkspaceId, WorkspaceStatus};
use wharf_engine::RuntimeError;
use wharf_infra::{FakeInfraAdapter, InfraCall};

#[tokio::test]
async fn competing_nodes_create_exactly_one_runtime() {
    let fake = FakeInfraAdapter::new();
    let coord = MemoryCoordinator::new();
    let node_a = node(&fake, &coord, "node-a");
    let node_b = node(&fake, &coord, "node-b");

    let config = dockerimage_config("ws1");
    let own = owner();
    let (a, b) = tokio::join!(node_a.start(&config, &own), node_b.start(&config, &own));

    // Exactly one winner; the loser sees the winner's claim.
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(
        loser,
        RuntimeError::Conflict { .. } | RuntimeError::Busy { .. }
    ));

    let ws = WorkspaceId::from("ws1");
    wait_for_status(&node_a, &ws, WorkspaceStatus::Running).await;
    assert_eq!(fake.create_count(), 1);
}

#[tokio::test]
async fn peer_stop_interrupts_a_start_in_flight_on_another_node() {
    let fake = FakeInfraAdapter::new();
    let coord = MemoryCoordinator::new();
    let node_a = node(&fake, &coord, "node-a");
    let node_b = node(&fake, &coord, "node-b");

    // Hold node A inside the backend start call.
    fake.set_start_delay(Duration::from_secs(30));
    node_a.start(&dockerimage_config("ws1"), &owner()).await.unwrap();

    let ws = WorkspaceId::from("ws1");
    assert_eq!(node_a.status(&ws).await.unwrap(), WorkspaceStatus::Starting);

    // Wait until node A has created the runtime and is blocked in start,
    // so the stop below has backend resources to tear down.
    for _ in 0..400 {
        if fake
            .calls()
            .iter()
            .any(|call| matches!(call, InfraCall::Start(w) if w.as_str() == "ws1"))
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Node B only writes Stopping to the cache; node A owns the attempt.
    node_b.stop(&ws, None).await.unwrap();

    wait_for_status(&node_a, &ws, WorkspaceStatus::Stopped).await;
    assert!(fake
        .calls()
        .iter()
        .any(|call| matches!(call, InfraCall::Destroy(w) if w.as_str() == "ws1")));
}

#[tokio::test]
async fn stop_reason_rides_on_the_status_event() {
    let fake = FakeInfraAdapter::new();
    let coord = MemoryCoordinator::new();
    let rt = node(&fake, &coord, "node-a");

    rt.start(&dockerimage_config("ws1"), &owner()).await.unwrap();
    let ws = WorkspaceId::from("ws1");
    wait_for_status(&rt, &ws, WorkspaceStatus::Running).await;

    let mut events = rt.subscribe_events();
    rt.stop(&ws, Some("requested by user".to_string())).await.unwrap();

    let mut seen_reason = None;
    for _ in 0..16 {
        match tokio::time::timeout(Duration::from_secs(1), events.recv()).await {
            Ok(Ok(Event::StatusChanged {
                new: WorkspaceStatus::Stopping,
                reason,
                ..
            })) => {
                seen_reason = reason;
                break;
            }
            Ok(Ok(_)) => continue,
            _ => break,
        }
    }
    assert_eq!(seen_reason.as_deref(), Some("requested by user"));
}

#[test]
fn status_events_serialize_with_a_type_tag() {
    let event = Event::StatusChanged {
        workspace_id: WorkspaceId::from("ws1"),
        old: WorkspaceStatus::Starting,
        new: WorkspaceStatus::Running,
        epoch_ms: 1_000,
        reason: None,
        error: None,
    };

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "runtime:status");
    assert_eq!(json["workspace_id"], "ws1");
    assert_eq!(json["new"], "running");
}
