// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Activity tracking, coalescing, and idle expiry.

use std::time::Duration;

use wharf_coord::{ActivityStore, MemoryCoordinator, StatusCache};
use wharf_core::test_support::dockerimage_config;
use wharf_core::{Event, FakeClock, NodeId, OwnerId, WorkspaceId, WorkspaceStatus};
use wharf_engine::{
    ActivityMonitor, MonitorConfig, Runtimes, RuntimesConfig, IDLE_TIMEOUT_REASON,
};
use wharf_env::InlineOnlyRetriever;
use wharf_infra::FakeInfraAdapter;

type ClockedRuntimes = Runtimes<FakeInfraAdapter, MemoryCoordinator, InlineOnlyRetriever, FakeClock>;
type ClockedMonitor =
    ActivityMonitor<FakeInfraAdapter, MemoryCoordinator, InlineOnlyRetriever, FakeClock>;

fn fixture(clock: &FakeClock) -> (MemoryCoordinator, ClockedRuntimes, ClockedMonitor) {
    let fake = FakeInfraAdapter::new();
    let coord = MemoryCoordinator::new();
    let runtimes = Runtimes::new(
        fake,
        coord.clone(),
        InlineOnlyRetriever,
        clock.clone(),
        RuntimesConfig {
            node: NodeId::from("node-a"),
            namespace: "test".to_string(),
            lock_wait: Duration::from_millis(100),
            start_poll: Duration::from_millis(5),
            start_timeout: Duration::from_secs(2),
        },
    );
    let monitor = ActivityMonitor::new(
        runtimes.clone(),
        coord.clone(),
        clock.clone(),
        MonitorConfig {
            threshold: Duration::from_millis(200),
            idle_timeout: Some(Duration::from_secs(5)),
            run_timeout: None,
            sweep_interval: Duration::from_millis(50),
        },
    );
    (coord, runtimes, monitor)
}

async fn wait_for_running(coord: &MemoryCoordinator, ws: &WorkspaceId) {
    for _ in 0..400 {
        let running = coord
            .get(ws)
            .await
            .unwrap()
            .is_some_and(|e| e.status == WorkspaceStatus::Running);
        if running {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("workspace '{ws}' never reached running");
}

#[tokio::test]
async fn activity_below_the_threshold_coalesces_into_one_cache_write() {
    let clock = FakeClock::at(10_000);
    let (coord, _runtimes, monitor) = fixture(&clock);
    let ws = WorkspaceId::from("ws1");

    // t=0: first write lands
    monitor.record_activity(&ws).await.unwrap();
    assert_eq!(coord.last_activity(&ws).await.unwrap(), Some(10_000));

    // t=50ms: within the 200ms window, no second write
    clock.advance(50);
    monitor.record_activity(&ws).await.unwrap();
    assert_eq!(coord.last_activity(&ws).await.unwrap(), Some(10_000));

    // t=260ms: past the window, second write lands
    clock.advance(210);
    monitor.record_activity(&ws).await.unwrap();
    assert_eq!(coord.last_activity(&ws).await.unwrap(), Some(10_260));
}

#[tokio::test]
async fn idle_runtime_is_stopped_by_the_sweep_with_the_idle_reason() {
    let clock = FakeClock::at(10_000);
    let (coord, runtimes, monitor) = fixture(&clock);

    runtimes
        .start(&dockerimage_config("ws1"), &OwnerId::from("owner-1"))
        .await
        .unwrap();
    let ws = WorkspaceId::from("ws1");
    wait_for_running(&coord, &ws).await;

    monitor.record_activity(&ws).await.unwrap();
    let mut events = runtimes.subscribe_events();

    // Not yet idle
    clock.advance(3_000);
    monitor.sweep().await.unwrap();
    assert!(coord.get(&ws).await.unwrap().is_some());

    // Past the 5s idle timeout
    clock.advance(3_000);
    monitor.sweep().await.unwrap();

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
    assert_eq!(seen_reason.as_deref(), Some(IDLE_TIMEOUT_REASON));
}
