// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! OpenShift adapter.
//!
//! OpenShift speaks the Kubernetes API; the only differences the runtime
//! cares about are the CLI binary (`oc`) and project bootstrap, so this is
//! a thin wrapper over [`KubernetesAdapter`].

use async_trait::async_trait;
use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::ContainerEnvironment;

use crate::adapter::InfraAdapter;
use crate::backoff::RetryPolicy;
use crate::error::InfraError;
use crate::handle::{RuntimeHandle, RuntimeState};
use crate::kubernetes::KubernetesAdapter;

#[derive(Debug, Clone)]
pub struct OpenshiftAdapter {
    inner: KubernetesAdapter,
}

impl Default for OpenshiftAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenshiftAdapter {
    pub fn new() -> Self {
        Self {
            inner: KubernetesAdapter::with_bin("oc"),
        }
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.retry(retry);
        self
    }
}

#[async_trait]
impl InfraAdapter for OpenshiftAdapter {
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError> {
        self.inner.create(env, identity).await
    }

    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError> {
        self.inner.start(handle, cancel).await
    }

    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        self.inner.stop(handle).await
    }

    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        self.inner.destroy(handle).await
    }

    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError> {
        self.inner.status(handle).await
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError> {
        self.inner.list_runtimes().await
    }
}
