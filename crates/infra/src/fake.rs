// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! In-memory infrastructure adapter for tests.
//!
//! Records every call, lets tests script failures and slow starts, and
//! reports machine states without any real backend.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use wharf_core::{CancelFlag, RuntimeIdentity, WorkspaceId};
use wharf_env::ContainerEnvironment;

use crate::adapter::InfraAdapter;
use crate::error::InfraError;
use crate::handle::{MachineState, RuntimeHandle, RuntimeState};

use async_trait::async_trait;

/// One recorded adapter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfraCall {
    Create(WorkspaceId),
    Start(WorkspaceId),
    Stop(WorkspaceId),
    Destroy(WorkspaceId),
    Status(WorkspaceId),
    ListRuntimes,
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<InfraCall>>,
    fail_create: Mutex<VecDeque<InfraError>>,
    fail_start: Mutex<VecDeque<InfraError>>,
    start_delay: Mutex<Option<Duration>>,
    /// Machine states per workspace; updated by start/stop, overridable.
    states: Mutex<IndexMap<WorkspaceId, IndexMap<String, MachineState>>>,
    existing: Mutex<Vec<RuntimeHandle>>,
}

#[derive(Clone, Default)]
pub struct FakeInfraAdapter {
    inner: Arc<Inner>,
}

impl FakeInfraAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<InfraCall> {
        self.inner.calls.lock().clone()
    }

    pub fn create_count(&self) -> usize {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|c| matches!(c, InfraCall::Create(_)))
            .count()
    }

    /// Queue an error for the next `create` call.
    pub fn fail_next_create(&self, err: InfraError) {
        self.inner.fail_create.lock().push_back(err);
    }

    /// Queue an error for the next `start` call.
    pub fn fail_next_start(&self, err: InfraError) {
        self.inner.fail_start.lock().push_back(err);
    }

    /// Make `start` take this long, checking the cancel flag while waiting.
    pub fn set_start_delay(&self, delay: Duration) {
        *self.inner.start_delay.lock() = Some(delay);
    }

    /// Seed a leftover runtime reported by `list_runtimes` (recovery).
    /// The handle carries a single `dev` machine, already running.
    pub fn add_existing(&self, identity: RuntimeIdentity) {
        let mut machines = IndexMap::new();
        machines.insert(
            "dev".to_string(),
            format!("fake-{}-dev", identity.workspace_id),
        );
        self.inner.states.lock().insert(
            identity.workspace_id.clone(),
            machines
                .keys()
                .map(|m| (m.clone(), MachineState::Running))
                .collect(),
        );
        self.inner.existing.lock().push(RuntimeHandle {
            scope: format!("fake-{}", identity.workspace_id),
            identity,
            machines,
            backend: "fake".to_string(),
        });
    }

    /// Override one machine's observed state.
    pub fn set_machine_state(&self, workspace_id: &WorkspaceId, machine: &str, state: MachineState) {
        let mut states = self.inner.states.lock();
        states
            .entry(workspace_id.clone())
            .or_default()
            .insert(machine.to_string(), state);
    }

    fn record(&self, call: InfraCall) {
        self.inner.calls.lock().push(call);
    }

    fn set_all(&self, workspace_id: &WorkspaceId, state: MachineState) {
        let mut states = self.inner.states.lock();
        if let Some(machines) = states.get_mut(workspace_id) {
            for value in machines.values_mut() {
                *value = state;
            }
        }
    }
}

#[async_trait]
impl InfraAdapter for FakeInfraAdapter {
    async fn create(
        &self,
        env: &ContainerEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<RuntimeHandle, InfraError> {
        self.record(InfraCall::Create(identity.workspace_id.clone()));
        if let Some(err) = self.inner.fail_create.lock().pop_front() {
            return Err(err);
        }

        let mut machines = IndexMap::new();
        let mut states = IndexMap::new();
        for (machine, _) in env.containers() {
            machines.insert(
                machine.clone(),
                format!("fake-{}-{machine}", identity.workspace_id),
            );
            states.insert(machine.clone(), MachineState::Pending);
        }
        self.inner
            .states
            .lock()
            .insert(identity.workspace_id.clone(), states);

        Ok(RuntimeHandle {
            identity: identity.clone(),
            machines,
            backend: "fake".to_string(),
            scope: format!("fake-{}", identity.workspace_id),
        })
    }

    async fn start(&self, handle: &RuntimeHandle, cancel: &CancelFlag) -> Result<(), InfraError> {
        self.record(InfraCall::Start(handle.identity.workspace_id.clone()));
        if let Some(err) = self.inner.fail_start.lock().pop_front() {
            return Err(err);
        }
        let delay = *self.inner.start_delay.lock();
        if let Some(delay) = delay {
            let deadline = tokio::time::Instant::now() + delay;
            while tokio::time::Instant::now() < deadline {
                if cancel.is_cancelled() {
                    return Err(InfraError::Interrupted);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
        if cancel.is_cancelled() {
            return Err(InfraError::Interrupted);
        }
        self.set_all(&handle.identity.workspace_id, MachineState::Running);
        Ok(())
    }

    async fn stop(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        self.record(InfraCall::Stop(handle.identity.workspace_id.clone()));
        self.set_all(&handle.identity.workspace_id, MachineState::Exited);
        Ok(())
    }

    async fn destroy(&self, handle: &RuntimeHandle) -> Result<(), InfraError> {
        self.record(InfraCall::Destroy(handle.identity.workspace_id.clone()));
        self.inner
            .states
            .lock()
            .shift_remove(&handle.identity.workspace_id);
        self.inner
            .existing
            .lock()
            .retain(|h| h.identity != handle.identity);
        Ok(())
    }

    async fn status(&self, handle: &RuntimeHandle) -> Result<RuntimeState, InfraError> {
        self.record(InfraCall::Status(handle.identity.workspace_id.clone()));
        let states = self.inner.states.lock();
        let machines = match states.get(&handle.identity.workspace_id) {
            Some(machines) => machines.clone(),
            None => handle
                .machines
                .keys()
                .map(|m| (m.clone(), MachineState::Gone))
                .collect(),
        };
        Ok(RuntimeState { machines })
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeHandle>, InfraError> {
        self.record(InfraCall::ListRuntimes);
        Ok(self.inner.existing.lock().clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
