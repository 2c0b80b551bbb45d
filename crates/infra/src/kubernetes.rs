// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Kubernetes adapter.
//!
//! Drives `kubectl` against the runtime's namespace. One pod per machine,
//! labelled `wharf.io/*` for recovery. Kubernetes has no created-but-stopped
//! pod state, so `create` applies the manifests (scheduling begins
//! immediately) and `start` only verifies none of them failed outright;
//! the engine's status polling does the actual readiness wait.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::json;
use tokio::process::Command;
use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::{Container, ContainerEnvironment, RestartPolicy};

use crate::adapter::InfraAdapter;
use crate::backoff::{with_retry, RetryPolicy};
use crate::error::InfraError;
use crate::handle::{MachineState, RuntimeHandle, RuntimeState};
use crate::subprocess::{run_backend, CLUSTER_TIMEOUT};

pub(crate) const LABEL_WORKSPACE: &str = "wharf.io/workspace-id";
pub(crate) const LABEL_OWNER: &str = "wharf.io/owner-id";
pub(crate) const LABEL_ATTEMPT: &str = "wharf.io/attempt";
pub(crate) const LABEL_MACHINE: &str = "wharf.io/machine";

/// Adapter over a Kubernetes cluster.
#[derive(Debug, Clone)]
pub struct KubernetesAdapter {
    bin: String,
    retry: RetryPolicy,
}

impl Default for KubernetesAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl KubernetesAdapter {
    pub fn new() -> Self {
        Self::with_bin("kubectl")
    }

    /// Use an alternative CLI binary (`oc` for OpenShift).
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

    pub(crate) fn pod_name(identity: &RuntimeIdentity, machine: &str) -> String {
        format!(
            "{}-{}-{}",
            identity.workspace_id,
            machine,
            identity.attempt.short(8)
        )
    }

    async fn ensure_namespace(&self, namespace: &str) -> Result<(), InfraError> {
        let result = with_retry(&self.retry, "create namespace", || {
            run_backend(
                self.cmd(&["create", "namespace", namespace]),
                None,
                CLUSTER_TIMEOUT,
                "create namespace",
            )
        })
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(InfraError::Fatal(msg)) if msg.to_ascii_lowercase().contains("already exists") => {
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn apply_pod(
        &self,
        identity: &RuntimeIdentity,
        env: &ContainerEnvironment,
        machine: &str,
        container: &Container,
    ) -> Result<String, InfraError> {
        let Some(image) = &container.image else {
            return Err(InfraError::Fatal(format!(
                "machine '{machine}' is dockerfile-backed; the cluster backend cannot build images"
            )));
        };

        let pod = Self::pod_name(identity, machine);
        let manifest = pod_manifest(identity, env, machine, container, &pod, image);
        let payload = serde_json::to_string(&manifest)
            .map_err(|e| InfraError::Fatal(format!("pod manifest for '{machine}': {e}")))?;

        with_retry(&self.retry, "apply pod", || {
            run_backend(
                self.cmd(&["apply", "-f", "-"]),
                Some(&payload),
                CLUSTER_TIMEOUT,
                "apply pod",
            )
        })
        .await?;
        Ok(pod)
    }

    async fn pod_phase(
        &self,
        namespace: &str,
        pod: &str,
    ) -> Result<Option<String>, InfraError> {
        let result = run_backend(
            self.cmd(&[
                "get",
                "pod",
                pod,
                "-n",
                namespace,
                "-o",
                "jsonpath={.status.phase}",
            ]),
            None,
            CLUSTER_TIMEOUT,
            "get pod",
        )
        .await;
        match result {
            Ok(phase) => Ok(Some(phase)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn delete_pod(&self, namespace: &str, pod: &str, wait: bool) -> Result<(), InfraError> {
        let wait_flag = if wait { "--wait=true" } else { "--wait=false" };
        let result = with_retry(&self.retry, "delete pod", || {
            run_backend(
                self.cmd(&["delete", "pod", pod, "-n", namespace, wait_flag]),
                None,
                CLUSTER_TIMEOUT,
                "delete pod",
            )
        })
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.is_missing() => Ok(()),
            Err(err) => Err(err),
        }
    }
}

fn pod_manifest(
    identity: &RuntimeIdentity,
    env: &ContainerEnvironment,
    machine: &str,
    container: &Container,
    pod: &str,
    image: &str,
) -> serde_json::Value {
    let mut labels = serde_json::Map::new();
    labels.insert(LABEL_WORKSPACE.into(), json!(identity.workspace_id));
    labels.insert(LABEL_OWNER.into(), json!(identity.owner_id));
    labels.insert(LABEL_ATTEMPT.into(), json!(identity.attempt));
    labels.insert(LABEL_MACHINE.into(), json!(machine));
    for (key, value) in &container.labels {
        labels.insert(key.clone(), json!(value));
    }

    let env_vars: Vec<_> = container
        .environment
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    let ports: Vec<_> = container
        .expose
        .iter()
        .map(|port| json!({ "containerPort": port }))
        .collect();
    let mounts: Vec<_> = container
        .volumes
        .iter()
        .map(|m| json!({ "name": m.volume, "mountPath": m.mount_path }))
        .collect();
    let volumes: Vec<_> = container
        .volumes
        .iter()
        .map(|m| json!({ "name": m.volume, "emptyDir": {} }))
        .collect();

    let mut spec_container = serde_json::Map::new();
    spec_container.insert("name".into(), json!(machine));
    spec_container.insert("image".into(), json!(image));
    if !env_vars.is_empty() {
        spec_container.insert("env".into(), json!(env_vars));
    }
    if !ports.is_empty() {
        spec_container.insert("ports".into(), json!(ports));
    }
    if !mounts.is_empty() {
        spec_container.insert("volumeMounts".into(), json!(mounts));
    }
    if let Some(bytes) = container.mem_limit_bytes {
        spec_container.insert(
            "resources".into(),
            json!({ "limits": { "memory": bytes.to_string() } }),
        );
    }

    let restart = match env.restart_policy {
        RestartPolicy::Never => "Never",
        RestartPolicy::OnFailure => "OnFailure",
        RestartPolicy::Always => "Always",
    };

    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": pod,
            "namespace": identity.namespace,
            "labels": labels,
        },
        "spec": {
            "restartPolicy": restart,
            "containers": [spec_container],
            "volumes": volumes,
        },
    })
}

fn parse_pod_phase(phase: Option<&str>) -> MachineState {
    match phase.map(str::trim) {
        None | Some("") => MachineState::Gone,
        Some("Pending") => MachineState::Pending,
        Some("Running") => MachineState::Running,
        Some("Succeeded") | Some("Failed") => MachineState::Exited,
        Some(_) => MachineState::Pending,
    }
}

#[async_trait]
impl InfraAdapter for KubernetesAdapter {
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError> {
        self.ensure_namespace(&identity.namespace).await?;

        let mut machines = IndexMap::new();
        for (machine, container) in env.containers() {
            let pod = self.apply_pod(identity, env, machine, container).await?;
            tracing::debug!(machine, %pod, "pod applied");
            machines.insert(machine.clone(), pod);
        }

        Ok(RuntimeHandle {
            identity: identity.clone(),
            machines,
            backend: self.backend_name().to_string(),
            scope: identity.namespace.clone(),
        })
    }

    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError> {
        for (machine, pod) in &handle.machines {
            if cancel.is_cancelled() {
                return Err(InfraError::Interrupted);
            }
            let phase = self.pod_phase(&handle.scope, pod).await?;
            match parse_pod_phase(phase.as_deref()) {
                MachineState::Exited | MachineState::Gone => {
                    return Err(InfraError::Fatal(format!(
                        "pod for machine '{machine}' failed before start (phase {phase:?})"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        for pod in handle.machines.values() {
            self.delete_pod(&handle.scope, pod, false).await?;
        }
        Ok(())
    }

    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        for pod in handle.machines.values() {
            self.delete_pod(&handle.scope, pod, true).await?;
        }
        Ok(())
    }

    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError> {
        let mut machines = IndexMap::new();
        for (machine, pod) in &handle.machines {
            let phase = self.pod_phase(&handle.scope, pod).await?;
            machines.insert(machine.clone(), parse_pod_phase(phase.as_deref()));
        }
        Ok(RuntimeState { machines })
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError> {
        let selector = LABEL_WORKSPACE;
        let template = format!(
            "{{range .items}}{{index .metadata.labels \"{LABEL_WORKSPACE}\"}}|{{index .metadata.labels \"{LABEL_OWNER}\"}}|{{.metadata.namespace}}|{{index .metadata.labels \"{LABEL_ATTEMPT}\"}}|{{index .metadata.labels \"{LABEL_MACHINE}\"}}|{{.metadata.name}}{{\"\\n\"}}{{end}}"
        );
        let stdout = with_retry(&self.retry, "list pods", || {
            run_backend(
                self.cmd(&[
                    "get",
                    "pods",
                    "--all-namespaces",
                    "-l",
                    selector,
                    "-o",
                    &format!("jsonpath={template}"),
                ]),
                None,
                CLUSTER_TIMEOUT,
                "list pods",
            )
        })
        .await?;

        let mut handles: IndexMap<_, RuntimeHandle> = IndexMap::new();
        for line in stdout.lines() {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() != 6 || parts.iter().any(|p| p.is_empty()) {
                tracing::warn!(%line, "skipping pod with incomplete wharf labels");
                continue;
            }
            let identity = RuntimeIdentity::new(parts[0], parts[1], parts[2], parts[3]);
            let key = (identity.workspace_id.clone(), identity.attempt.clone());
            let handle = handles.entry(key).or_insert_with(|| RuntimeHandle {
                scope: identity.namespace.clone(),
                identity,
                machines: IndexMap::new(),
                backend: self.backend_name().to_string(),
            });
            handle
                .machines
                .insert(parts[4].to_string(), parts[5].to_string());
        }
        Ok(handles.into_values().collect())
    }
}

impl KubernetesAdapter {
    fn backend_name(&self) -> &'static str {
        if self.bin == "oc" {
            "openshift"
        } else {
            "kubernetes"
        }
    }
}

#[cfg(test)]
#[path = "kubernetes_tests.rs"]
mod tests;
