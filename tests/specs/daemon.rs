// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Daemon lifecycle: startup, configuration, graceful handover.

use std::time::Duration;

use wharf_core::test_support::dockerimage_config;
use wharf_core::{OwnerId, WorkspaceId, WorkspaceStatus};
use wharf_daemon::{startup, Config, LifecycleError};
use wharf_infra::FakeInfraAdapter;

async fn wait_for_status(
    rt: &wharf_daemon::DaemonRuntimes<FakeInfraAdapter>,
    ws: &WorkspaceId,
    want: WorkspaceStatus,
) {
    for _ in 0..400 {
        if rt.status(ws).await.unwrap() == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("workspace '{ws}' never reached {want}");
}

#[tokio::test]
async fn daemon_round_trip_releases_the_lock_for_a_successor() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(dir.path().to_path_buf()).unwrap();

    let mut state = startup(&config, FakeInfraAdapter::new()).await.unwrap();

    state
        .runtimes
        .start(&dockerimage_config("ws1"), &OwnerId::from("owner-1"))
        .await
        .unwrap();
    let ws = WorkspaceId::from("ws1");
    wait_for_status(&state.runtimes, &ws, WorkspaceStatus::Running).await;

    state.shutdown().await.unwrap();
    assert_eq!(
        state.runtimes.status(&ws).await.unwrap(),
        WorkspaceStatus::Stopping
    );
    drop(state);

    // Lock is free again; a successor daemon comes up cleanly.
    let successor = startup(&config, FakeInfraAdapter::new()).await.unwrap();
    drop(successor);
}

#[tokio::test]
async fn daemon_refuses_a_second_instance_on_the_same_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(dir.path().to_path_buf()).unwrap();

    let _state = startup(&config, FakeInfraAdapter::new()).await.unwrap();
    let err = startup(&config, FakeInfraAdapter::new()).await.unwrap_err();
    assert!(matches!(err, LifecycleError::LockFailed(_)));
}

#[tokio::test]
async fn config_file_settings_reach_the_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "node = \"node-x\"\nnamespace = \"team-blue\"\n",
    )
    .unwrap();
    let config = Config::load_from(dir.path().to_path_buf()).unwrap();

    let state = startup(&config, FakeInfraAdapter::new()).await.unwrap();

    let identity = state
        .runtimes
        .start(&dockerimage_config("ws1"), &OwnerId::from("owner-1"))
        .await
        .unwrap();
    assert_eq!(identity.namespace, "team-blue");
}
