// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;
use crate::provision::ProvisionContext;
use crate::test_util::parsed;
use wharf_core::test_support::{dockerimage_config, identity};

#[test]
fn mounts_workspace_scoped_project_volume() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    ProjectVolume.provision(&ctx, &mut env).unwrap();

    let volumes = &env.container("dev").unwrap().volumes;
    assert!(volumes
        .iter()
        .any(|v| v.volume == "wharf-projects-ws1" && v.mount_path == PROJECTS_MOUNT_PATH));
}

#[test]
fn repeated_runs_do_not_duplicate_the_mount() {
    let config = dockerimage_config("ws1");
    let (internal, mut env) = parsed(&config);
    let id = identity("ws1");
    let ctx = ProvisionContext {
        identity: &id,
        environment: &internal,
    };

    ProjectVolume.provision(&ctx, &mut env).unwrap();
    ProjectVolume.provision(&ctx, &mut env).unwrap();

    assert_eq!(env.container("dev").unwrap().volumes.len(), 1);
}
