// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Traced adapter wrapper for consistent observability

use async_trait::async_trait;
use tracing::Instrument;
use wharf_core::{CancelFlag, RuntimeIdentity};
use wharf_env::ContainerEnvironment;

use crate::adapter::InfraAdapter;
use crate::error::InfraError;
use crate::handle::{RuntimeHandle, RuntimeState};

/// Wrapper that adds tracing to any InfraAdapter
#[derive(Clone)]
pub struct TracedInfra<I> {
    inner: I,
}

impl<I> TracedInfra<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<I: InfraAdapter> InfraAdapter for TracedInfra<I> {
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError> {
        async {
            tracing::info!(machines = env.containers().len(), "creating runtime");
            let start = std::time::Instant::now();
            let result = self.inner.create(env, identity).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(handle) => {
                    tracing::info!(backend = %handle.backend, scope = %handle.scope, elapsed_ms, "runtime created")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("infra.create", runtime = %identity))
        .await
    }

    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.start(handle, cancel).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "machines started"),
                Err(InfraError::Interrupted) => tracing::info!(elapsed_ms, "start interrupted"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("infra.start", runtime = %handle.identity))
        .await
    }

    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        let result = self.inner.stop(handle).await;
        tracing::info_span!("infra.stop", runtime = %handle.identity).in_scope(|| match &result {
            Ok(()) => tracing::info!("machines stopped"),
            Err(e) => tracing::warn!(error = %e, "stop failed"),
        });
        result
    }

    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        let result = self.inner.destroy(handle).await;
        tracing::info_span!("infra.destroy", runtime = %handle.identity).in_scope(|| {
            match &result {
                Ok(()) => tracing::info!("resources removed"),
                Err(e) => tracing::error!(error = %e, "destroy failed"),
            }
        });
        result
    }

    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError> {
        let result = self.inner.status(handle).await;
        tracing::trace!(runtime = %handle.identity, state = ?result.as_ref().ok(), "status checked");
        result
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError> {
        let result = self.inner.list_runtimes().await;
        match &result {
            Ok(handles) => tracing::debug!(count = handles.len(), "listed backend runtimes"),
            Err(e) => tracing::error!(error = %e, "list failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
