// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Docker engine adapter.
//!
//! Drives the `docker` CLI. Each runtime gets a dedicated bridge network;
//! containers are named `<workspace>-<machine>-<attempt8>` and tagged with
//! `io.wharf.*` labels so leftover resources can be found after a crash.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::process::Command;
use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::{Container, ContainerEnvironment, RestartPolicy};

use crate::adapter::InfraAdapter;
use crate::backoff::{with_retry, RetryPolicy};
use crate::error::InfraError;
use crate::handle::{MachineState, RuntimeHandle, RuntimeState};
use crate::subprocess::{run_backend, BUILD_TIMEOUT, DOCKER_TIMEOUT};

pub(crate) const LABEL_WORKSPACE: &str = "io.wharf.workspace-id";
pub(crate) const LABEL_OWNER: &str = "io.wharf.owner-id";
pub(crate) const LABEL_NAMESPACE: &str = "io.wharf.namespace";
pub(crate) const LABEL_ATTEMPT: &str = "io.wharf.attempt";
pub(crate) const LABEL_MACHINE: &str = "io.wharf.machine";

/// Adapter over a local or remote docker engine.
#[derive(Debug, Clone)]
pub struct DockerAdapter {
    bin: String,
    retry: RetryPolicy,
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerAdapter {
    pub fn new() -> Self {
        Self::with_bin("docker")
    }

    /// Use an alternative CLI binary (e.g. `podman`).
    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        cmd
    }

    pub(crate) fn container_name(identity: &RuntimeIdentity, machine: &str) -> String {
        format!(
            "{}-{}-{}",
            identity.workspace_id,
            machine,
            identity.attempt.short(8)
        )
    }

    pub(crate) fn network_name(env: &ContainerEnvironment, identity: &RuntimeIdentity) -> String {
        env.network
            .clone()
            .unwrap_or_else(|| format!("wharf-{}-{}", identity.workspace_id, identity.attempt.short(8)))
    }

    async fn ensure_network(
        &self,
        network: &str,
        identity: &RuntimeIdentity,
    ) -> Result<(), InfraError> {
        let workspace_label = format!("{LABEL_WORKSPACE}={}", identity.workspace_id);
        let result = with_retry(&self.retry, "docker network create", || {
            run_backend(
                self.cmd(&["network", "create", "--label", &workspace_label, network]),
                None,
                DOCKER_TIMEOUT,
                "docker network create",
            )
        })
        .await;
        match result {
            Ok(_) => Ok(()),
            // idempotent create across restarted attempts
            Err(InfraError::Fatal(msg)) if msg.to_ascii_lowercase().contains("already exists") => {
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Build the image for a dockerfile-backed machine and return its tag.
    async fn build_image(
        &self,
        identity: &RuntimeIdentity,
        machine: &str,
        dockerfile: &str,
    ) -> Result<String, InfraError> {
        let tag = format!(
            "wharf-{}-{}:{}",
            identity.workspace_id,
            machine,
            identity.attempt.short(8)
        );
        tracing::info!(machine, %tag, "building image from dockerfile");
        with_retry(&self.retry, "docker build", || {
            run_backend(
                self.cmd(&["build", "-q", "-t", &tag, "-"]),
                Some(dockerfile),
                BUILD_TIMEOUT,
                "docker build",
            )
        })
        .await?;
        Ok(tag)
    }

    async fn create_container(
        &self,
        identity: &RuntimeIdentity,
        env: &ContainerEnvironment,
        network: &str,
        machine: &str,
        container: &Container,
    ) -> Result<String, InfraError> {
        let image = match (&container.image, &container.dockerfile) {
            (Some(image), _) => image.clone(),
            (None, Some(dockerfile)) => self.build_image(identity, machine, dockerfile).await?,
            (None, None) => {
                return Err(InfraError::Fatal(format!(
                    "machine '{machine}' has neither image nor dockerfile"
                )))
            }
        };

        let name = Self::container_name(identity, machine);
        let mut args: Vec<String> = vec![
            "create".into(),
            "--name".into(),
            name.clone(),
            "--network".into(),
            network.into(),
        ];
        for label in [
            format!("{LABEL_WORKSPACE}={}", identity.workspace_id),
            format!("{LABEL_OWNER}={}", identity.owner_id),
            format!("{LABEL_NAMESPACE}={}", identity.namespace),
            format!("{LABEL_ATTEMPT}={}", identity.attempt),
            format!("{LABEL_MACHINE}={machine}"),
        ] {
            args.push("--label".into());
            args.push(label);
        }
        for (key, value) in &container.labels {
            args.push("--label".into());
            args.push(format!("{key}={value}"));
        }
        for (key, value) in &container.environment {
            args.push("--env".into());
            args.push(format!("{key}={value}"));
        }
        for mount in &container.volumes {
            args.push("--volume".into());
            args.push(format!("{}:{}", mount.volume, mount.mount_path));
        }
        for port in &container.expose {
            args.push("--expose".into());
            args.push(port.to_string());
        }
        if let Some(bytes) = container.mem_limit_bytes {
            args.push("--memory".into());
            args.push(bytes.to_string());
        }
        args.push("--restart".into());
        args.push(
            match env.restart_policy {
                RestartPolicy::Never => "no",
                RestartPolicy::OnFailure => "on-failure",
                RestartPolicy::Always => "always",
            }
            .into(),
        );
        args.push("--network-alias".into());
        args.push(machine.into());
        for alias in &container.aliases {
            args.push("--network-alias".into());
            args.push(alias.clone());
        }
        args.push(image);

        with_retry(&self.retry, "docker create", || {
            let mut cmd = Command::new(&self.bin);
            cmd.args(&args);
            run_backend(cmd, None, DOCKER_TIMEOUT, "docker create")
        })
        .await?;
        Ok(name)
    }
}

/// Parse one `workspace|owner|namespace|attempt|machine|name` line from
/// `docker ps`.
fn parse_container_line(line: &str) -> Option<(RuntimeIdentity, String, String)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() != 6 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    let identity = RuntimeIdentity::new(parts[0], parts[1], parts[2], parts[3]);
    Some((identity, parts[4].to_string(), parts[5].to_string()))
}

fn parse_container_state(status: &str) -> MachineState {
    match status.trim() {
        "running" | "restarting" => MachineState::Running,
        "created" | "paused" => MachineState::Pending,
        "exited" | "dead" | "removing" => MachineState::Exited,
        _ => MachineState::Gone,
    }
}

#[async_trait]
impl InfraAdapter for DockerAdapter {
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError> {
        let network = Self::network_name(env, identity);
        self.ensure_network(&network, identity).await?;

        let mut machines = IndexMap::new();
        for (machine, container) in env.containers() {
            let name = self
                .create_container(identity, env, &network, machine, container)
                .await?;
            tracing::debug!(machine, container = %name, "container created");
            machines.insert(machine.clone(), name);
        }

        Ok(RuntimeHandle {
            identity: identity.clone(),
            machines,
            backend: "docker".to_string(),
            scope: network,
        })
    }

    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError> {
        for (machine, name) in &handle.machines {
            if cancel.is_cancelled() {
                return Err(InfraError::Interrupted);
            }
            with_retry(&self.retry, "docker start", || {
                run_backend(
                    self.cmd(&["start", name]),
                    None,
                    DOCKER_TIMEOUT,
                    "docker start",
                )
            })
            .await?;
            tracing::debug!(machine, container = %name, "container started");
        }
        Ok(())
    }

    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        for name in handle.machines.values() {
            let result = with_retry(&self.retry, "docker stop", || {
                run_backend(
                    self.cmd(&["stop", name]),
                    None,
                    DOCKER_TIMEOUT,
                    "docker stop",
                )
            })
            .await;
            match result {
                Ok(_) => {}
                Err(err) if err.is_missing() => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        for name in handle.machines.values() {
            let result = with_retry(&self.retry, "docker rm", || {
                run_backend(
                    self.cmd(&["rm", "-f", name]),
                    None,
                    DOCKER_TIMEOUT,
                    "docker rm",
                )
            })
            .await;
            match result {
                Ok(_) => {}
                Err(err) if err.is_missing() => {}
                Err(err) => return Err(err),
            }
        }
        let result = with_retry(&self.retry, "docker network rm", || {
            run_backend(
                self.cmd(&["network", "rm", &handle.scope]),
                None,
                DOCKER_TIMEOUT,
                "docker network rm",
            )
        })
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.is_missing() => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError> {
        let mut machines = IndexMap::new();
        for (machine, name) in &handle.machines {
            let result = run_backend(
                self.cmd(&["inspect", "-f", "{{.State.Status}}", name]),
                None,
                DOCKER_TIMEOUT,
                "docker inspect",
            )
            .await;
            let state = match result {
                Ok(status) => parse_container_state(&status),
                Err(err) if err.is_missing() => MachineState::Gone,
                Err(err) => return Err(err),
            };
            machines.insert(machine.clone(), state);
        }
        Ok(RuntimeState { machines })
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError> {
        let format = format!(
            "{{{{.Label \"{LABEL_WORKSPACE}\"}}}}|{{{{.Label \"{LABEL_OWNER}\"}}}}|{{{{.Label \"{LABEL_NAMESPACE}\"}}}}|{{{{.Label \"{LABEL_ATTEMPT}\"}}}}|{{{{.Label \"{LABEL_MACHINE}\"}}}}|{{{{.Names}}}}"
        );
        let filter = format!("label={LABEL_WORKSPACE}");
        let stdout = with_retry(&self.retry, "docker ps", || {
            run_backend(
                self.cmd(&["ps", "-a", "--filter", &filter, "--format", &format]),
                None,
                DOCKER_TIMEOUT,
                "docker ps",
            )
        })
        .await?;

        let mut handles: IndexMap<_, RuntimeHandle> = IndexMap::new();
        for line in stdout.lines() {
            match parse_container_line(line) {
                Some((identity, machine, name)) => {
                    let key = (identity.workspace_id.clone(), identity.attempt.clone());
                    let handle = handles.entry(key).or_insert_with(|| RuntimeHandle {
                        scope: format!(
                            "wharf-{}-{}",
                            identity.workspace_id,
                            identity.attempt.short(8)
                        ),
                        identity,
                        machines: IndexMap::new(),
                        backend: "docker".to_string(),
                    });
                    handle.machines.insert(machine, name);
                }
                None => {
                    tracing::warn!(%line, "skipping container with incomplete wharf labels");
                }
            }
        }
        Ok(handles.into_values().collect())
    }
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
