// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use std::time::Duration;
use wharf_core::test_support::{dockerimage_config, identity};
use wharf_core::{OwnerId, WorkspaceId, WorkspaceStatus};
use wharf_engine::RuntimeError;
use wharf_infra::FakeInfraAdapter;

use crate::config::Config;

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config::load_from(dir.path().to_path_buf()).unwrap()
}

async fn wait_for_status(
    rt: &DaemonRuntimes<FakeInfraAdapter>,
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
async fn startup_writes_our_pid_into_the_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let state = startup(&config, FakeInfraAdapter::new()).await.unwrap();

    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    drop(state);
}

#[tokio::test]
async fn second_startup_loses_the_pid_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let _state = startup(&config, FakeInfraAdapter::new()).await.unwrap();
    let err = startup(&config, FakeInfraAdapter::new()).await.unwrap_err();

    assert!(matches!(err, LifecycleError::LockFailed(_)));
}

#[tokio::test]
async fn startup_recovers_runtimes_the_backend_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let fake = FakeInfraAdapter::new();
    fake.add_existing(identity("ws-recovered"));

    let state = startup(&config, fake).await.unwrap();

    let status = state
        .runtimes
        .status(&WorkspaceId::from("ws-recovered"))
        .await
        .unwrap();
    assert_eq!(status, WorkspaceStatus::Running);
}

#[tokio::test]
async fn shutdown_refuses_starts_and_removes_the_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut state = startup(&config, FakeInfraAdapter::new()).await.unwrap();

    let ws_config = dockerimage_config("ws1");
    let owner = OwnerId::from("owner1");
    state.runtimes.start(&ws_config, &owner).await.unwrap();
    wait_for_status(&state.runtimes, &WorkspaceId::from("ws1"), WorkspaceStatus::Running).await;

    state.shutdown().await.unwrap();

    assert!(!config.lock_path.exists());
    let err = state
        .runtimes
        .start(&dockerimage_config("ws2"), &owner)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Conflict { .. }));
}

#[tokio::test]
async fn shutdown_marks_owned_runtimes_stopping() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let mut state = startup(&config, FakeInfraAdapter::new()).await.unwrap();

    let ws = WorkspaceId::from("ws1");
    state
        .runtimes
        .start(&dockerimage_config("ws1"), &OwnerId::from("owner1"))
        .await
        .unwrap();
    wait_for_status(&state.runtimes, &ws, WorkspaceStatus::Running).await;

    state.shutdown().await.unwrap();

    let status = state.runtimes.status(&ws).await.unwrap();
    assert_eq!(status, WorkspaceStatus::Stopping);
}
