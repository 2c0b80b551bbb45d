// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! The runtime orchestrator.
//!
//! `Runtimes` drives every workspace through the status state machine.
//! All cross-node agreement goes through the coordination backend: the
//! shared cache is the only source of truth for statuses, and the only
//! channel by which one node interrupts a start driven by another. Local
//! memory holds nothing a peer ever needs to see, only the cancel flags
//! and backend handles of the attempts this node itself is driving.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use wharf_coord::{Coordinator, StatusEntry};
use wharf_core::{
    AttemptId, CancelFlag, Clock, Event, IdGen, NodeId, OwnerId, RuntimeIdentity, SystemClock,
    UuidIdGen, WorkspaceConfig, WorkspaceId, WorkspaceStatus,
};
use wharf_env::{EnvironmentFactory, ParserRegistry, RecipeRetriever};
use wharf_infra::{InfraAdapter, InfraError, RuntimeHandle};

use crate::error::RuntimeError;
use crate::provision::{default_pipeline, ProvisionContext, ProvisionerPipeline};

/// Tuning knobs for the orchestrator.
#[derive(Debug, Clone)]
pub struct RuntimesConfig {
    /// This node's name, recorded on every cache entry it writes.
    pub node: NodeId,
    /// Infrastructure namespace runtimes are created in.
    pub namespace: String,
    /// Bound on waiting for the per-workspace lock.
    pub lock_wait: Duration,
    /// Interval between machine status polls during a start.
    pub start_poll: Duration,
    /// Bound on waiting for all machines to come up.
    pub start_timeout: Duration,
}

impl Default for RuntimesConfig {
    fn default() -> Self {
        Self {
            node: NodeId::from("wharf-0"),
            namespace: "wharf".to_string(),
            lock_wait: Duration::from_millis(500),
            start_poll: Duration::from_millis(50),
            start_timeout: Duration::from_secs(300),
        }
    }
}

struct AttemptState {
    identity: RuntimeIdentity,
    cancel: CancelFlag,
    handle: Arc<Mutex<Option<RuntimeHandle>>>,
    task: Option<tokio::task::JoinHandle<()>>,
    watcher: Option<tokio::task::JoinHandle<()>>,
}

struct Inner<I, C, R, K> {
    adapter: I,
    coord: C,
    clock: K,
    factory: EnvironmentFactory<R>,
    registry: ParserRegistry,
    pipeline: ProvisionerPipeline,
    config: RuntimesConfig,
    ids: UuidIdGen,
    attempts: Mutex<HashMap<WorkspaceId, AttemptState>>,
    events: broadcast::Sender<Event>,
    refuse: AtomicBool,
}

/// Workspace runtime orchestrator.
pub struct Runtimes<I, C, R, K = SystemClock> {
    inner: Arc<Inner<I, C, R, K>>,
}

impl<I, C, R, K> Clone for Runtimes<I, C, R, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, C, R, K> Runtimes<I, C, R, K>
where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    pub fn new(adapter: I, coord: C, retriever: R, clock: K, config: RuntimesConfig) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Inner {
                adapter,
                coord,
                clock,
                factory: EnvironmentFactory::new(retriever),
                registry: ParserRegistry::with_defaults(),
                pipeline: default_pipeline(),
                config,
                ids: UuidIdGen,
                attempts: Mutex::new(HashMap::new()),
                events,
                refuse: AtomicBool::new(false),
            }),
        }
    }

    /// Stream of orchestration events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Current status per the shared cache; `Stopped` when absent.
    pub async fn status(&self, workspace_id: &WorkspaceId) -> Result<WorkspaceStatus, RuntimeError> {
        Ok(self
            .inner
            .coord
            .get(workspace_id)
            .await?
            .map_or(WorkspaceStatus::Stopped, |entry| entry.status))
    }

    /// Stop accepting new starts (node shutdown).
    pub fn refuse_starts(&self) {
        self.inner.refuse.store(true, Ordering::SeqCst);
    }

    /// Accept a start request and drive it asynchronously.
    ///
    /// Returns as soon as the `Starting` transition is published; the rest
    /// of the attempt runs in a background task and converges to `Running`
    /// or back to `Stopped` on its own. Exactly one node wins a race here:
    /// the loser observes an active cache entry under the lock and gets a
    /// `Conflict` (or `Busy` while the winner still holds the lock).
    pub async fn start(
        &self,
        config: &WorkspaceConfig,
        owner: &OwnerId,
    ) -> Result<RuntimeIdentity, RuntimeError> {
        let inner = &self.inner;
        let workspace_id = WorkspaceId::from(config.name.as_str());

        if inner.refuse.load(Ordering::SeqCst) {
            let status = self.status(&workspace_id).await?;
            tracing::info!(%workspace_id, "start refused, node is shutting down");
            return Err(RuntimeError::Conflict {
                workspace_id,
                status,
            });
        }

        let _guard = inner
            .coord
            .acquire(&workspace_id, &inner.config.node, inner.config.lock_wait)
            .await
            .map_err(RuntimeError::from_lock)?;

        if let Some(entry) = inner.coord.get(&workspace_id).await? {
            if !entry.status.can_transition_to(WorkspaceStatus::Starting) {
                return Err(RuntimeError::Conflict {
                    workspace_id,
                    status: entry.status,
                });
            }
        }

        let attempt = AttemptId::from(inner.ids.next());
        let identity = RuntimeIdentity::new(
            workspace_id.clone(),
            owner.clone(),
            inner.config.namespace.clone(),
            attempt.clone(),
        );
        let now = inner.clock.epoch_ms();
        inner
            .coord
            .put(
                &workspace_id,
                StatusEntry {
                    status: WorkspaceStatus::Starting,
                    node: inner.config.node.clone(),
                    epoch_ms: now,
                    attempt: attempt.clone(),
                },
            )
            .await?;
        self.publish(Event::StatusChanged {
            workspace_id: workspace_id.clone(),
            old: WorkspaceStatus::Stopped,
            new: WorkspaceStatus::Starting,
            epoch_ms: now,
            reason: None,
            error: None,
        });
        tracing::info!(runtime = %identity, "start accepted");

        let cancel = CancelFlag::new();
        let handle = Arc::new(Mutex::new(None));
        let watcher = tokio::spawn(watch_for_stopping(
            Arc::clone(&self.inner),
            self.inner.coord.subscribe(),
            workspace_id.clone(),
            cancel.clone(),
        ));
        let task = tokio::spawn(run_attempt(
            Arc::clone(&self.inner),
            config.clone(),
            identity.clone(),
            cancel.clone(),
            Arc::clone(&handle),
        ));
        inner.attempts.lock().insert(
            workspace_id,
            AttemptState {
                identity: identity.clone(),
                cancel,
                handle,
                task: Some(task),
                watcher: Some(watcher),
            },
        );
        Ok(identity)
    }

    /// Stop a runtime, interrupting an in-flight start if necessary.
    ///
    /// The `Stopping` cache entry is written first; for a runtime driven by
    /// a peer node that write is the whole job, since the owner observes it
    /// and converges to `Stopped` itself.
    pub async fn stop(
        &self,
        workspace_id: &WorkspaceId,
        reason: Option<String>,
    ) -> Result<(), RuntimeError> {
        let inner = &self.inner;
        let _guard = inner
            .coord
            .acquire(workspace_id, &inner.config.node, inner.config.lock_wait)
            .await
            .map_err(RuntimeError::from_lock)?;

        let Some(entry) = inner.coord.get(workspace_id).await? else {
            return Err(RuntimeError::NotFound {
                workspace_id: workspace_id.clone(),
            });
        };
        if !entry.status.can_stop() {
            return Err(RuntimeError::Conflict {
                workspace_id: workspace_id.clone(),
                status: entry.status,
            });
        }

        // stop wins: never let an in-flight status write outrank this one
        let now = inner.clock.epoch_ms().max(entry.epoch_ms + 1);
        inner
            .coord
            .put(
                workspace_id,
                StatusEntry {
                    status: WorkspaceStatus::Stopping,
                    node: inner.config.node.clone(),
                    epoch_ms: now,
                    attempt: entry.attempt.clone(),
                },
            )
            .await?;
        self.publish(Event::StoppingIntent {
            workspace_id: workspace_id.clone(),
            requested_by: inner.config.node.clone(),
            epoch_ms: now,
        });
        self.publish(Event::StatusChanged {
            workspace_id: workspace_id.clone(),
            old: entry.status,
            new: WorkspaceStatus::Stopping,
            epoch_ms: now,
            reason: reason.clone(),
            error: None,
        });
        tracing::info!(%workspace_id, ?reason, "stopping");

        let state = inner.attempts.lock().remove(workspace_id);
        let Some(mut state) = state else {
            // peer-owned runtime; the owning node finishes the job
            return Ok(());
        };

        state.cancel.cancel();
        if let Some(task) = state.task.take() {
            let _ = task.await;
        }
        if let Some(watcher) = state.watcher.take() {
            watcher.abort();
        }

        // if the attempt task already tore everything down the entry is
        // gone; otherwise the runtime reached Running and we own teardown
        if inner.coord.get(workspace_id).await?.is_some() {
            let handle = state.handle.lock().take();
            if let Some(handle) = handle {
                if let Err(err) = inner.adapter.stop(&handle).await {
                    tracing::warn!(%workspace_id, error = %err, "backend stop failed");
                }
                if let Err(err) = inner.adapter.destroy(&handle).await {
                    tracing::warn!(%workspace_id, error = %err, "backend destroy failed");
                }
            }
            inner.coord.remove(workspace_id).await?;
            let _ = inner.coord.forget(workspace_id).await;
            self.publish(Event::StatusChanged {
                workspace_id: workspace_id.clone(),
                old: WorkspaceStatus::Stopping,
                new: WorkspaceStatus::Stopped,
                epoch_ms: inner.clock.epoch_ms(),
                reason,
                error: None,
            });
        }
        Ok(())
    }

    /// Re-attach runtimes the backend still holds resources for.
    ///
    /// Called once at node startup, before serving requests. Recovered
    /// runtimes are registered as `Running` and given fresh activity so
    /// they are not expired on the next sweep.
    pub async fn recover(&self) -> Result<Vec<RuntimeIdentity>, RuntimeError> {
        let inner = &self.inner;
        let handles = inner.adapter.list_runtimes().await?;
        let mut identities = Vec::with_capacity(handles.len());
        for handle in handles {
            let identity = handle.identity.clone();
            let workspace_id = identity.workspace_id.clone();
            let now = inner.clock.epoch_ms();
            inner
                .coord
                .put(
                    &workspace_id,
                    StatusEntry {
                        status: WorkspaceStatus::Running,
                        node: inner.config.node.clone(),
                        epoch_ms: now,
                        attempt: identity.attempt.clone(),
                    },
                )
                .await?;
            inner.coord.record(&workspace_id, now).await?;

            let cancel = CancelFlag::new();
            let watcher = tokio::spawn(watch_for_stopping(
                Arc::clone(&self.inner),
                inner.coord.subscribe(),
                workspace_id.clone(),
                cancel.clone(),
            ));
            inner.attempts.lock().insert(
                workspace_id,
                AttemptState {
                    identity: identity.clone(),
                    cancel,
                    handle: Arc::new(Mutex::new(Some(handle))),
                    task: None,
                    watcher: Some(watcher),
                },
            );
            self.publish(Event::RuntimeRecovered {
                identity: identity.clone(),
                epoch_ms: now,
            });
            tracing::info!(runtime = %identity, "runtime recovered");
            identities.push(identity);
        }
        Ok(identities)
    }

    /// Graceful shutdown handover: refuse new starts, then mark every
    /// runtime this node owns as stopping so peers treat them as
    /// mid-shutdown. Backend resources are left alone.
    pub async fn handover(&self) -> Result<(), RuntimeError> {
        self.refuse_starts();
        let inner = &self.inner;
        let owned: Vec<WorkspaceId> = inner.attempts.lock().keys().cloned().collect();
        for workspace_id in owned {
            let Some(entry) = inner.coord.get(&workspace_id).await? else {
                continue;
            };
            if !entry.status.can_stop() {
                continue;
            }
            let now = inner.clock.epoch_ms().max(entry.epoch_ms + 1);
            inner
                .coord
                .put(
                    &workspace_id,
                    StatusEntry {
                        status: WorkspaceStatus::Stopping,
                        node: inner.config.node.clone(),
                        epoch_ms: now,
                        attempt: entry.attempt.clone(),
                    },
                )
                .await?;
            self.publish(Event::StoppingIntent {
                workspace_id: workspace_id.clone(),
                requested_by: inner.config.node.clone(),
                epoch_ms: now,
            });
            self.publish(Event::StatusChanged {
                workspace_id,
                old: entry.status,
                new: WorkspaceStatus::Stopping,
                epoch_ms: now,
                reason: Some("node shutting down".to_string()),
                error: None,
            });
        }
        Ok(())
    }

    /// Workspaces this node is currently driving or hosting.
    pub fn owned(&self) -> Vec<RuntimeIdentity> {
        self.inner
            .attempts
            .lock()
            .values()
            .map(|state| state.identity.clone())
            .collect()
    }

    pub(crate) fn publish(&self, event: Event) {
        let _ = self.inner.events.send(event);
    }
}

/// React to a stopping entry appearing in the cache. This is the only
/// interrupt path; nothing ever calls into another node's memory.
///
/// The cancel flag interrupts a start still in flight, whose attempt task
/// then cleans up after itself. A runtime that already reached `Running`
/// (or was recovered) has no task left to do that, so the watcher itself
/// finishes the job: a peer's `Stopping` write must converge to `Stopped`
/// on the node hosting the backend resources.
async fn watch_for_stopping<I, C, R, K>(
    inner: Arc<Inner<I, C, R, K>>,
    mut rx: broadcast::Receiver<(WorkspaceId, StatusEntry)>,
    workspace_id: WorkspaceId,
    cancel: CancelFlag,
) where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    loop {
        match rx.recv().await {
            Ok((id, entry))
                if id == workspace_id && entry.status == WorkspaceStatus::Stopping =>
            {
                cancel.cancel();
                converge_local_stop(&inner, &workspace_id, &entry.attempt).await;
                break;
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Tear down a hosted runtime whose `Stopping` entry was written by a peer.
///
/// A start still in flight is left to its own attempt task, which observes
/// the tripped cancel flag and cleans up; this waits for it and then takes
/// whatever survived. No-op when the local stop path already claimed the
/// attempt, when the attempt in the cache is not the one this node hosts,
/// or during handover, where the `Stopping` entries are this node's own
/// and backend resources are deliberately left for a successor.
async fn converge_local_stop<I, C, R, K>(
    inner: &Arc<Inner<I, C, R, K>>,
    workspace_id: &WorkspaceId,
    attempt: &AttemptId,
) where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    if inner.refuse.load(Ordering::SeqCst) {
        return;
    }
    loop {
        let in_flight = {
            let attempts = inner.attempts.lock();
            match attempts.get(workspace_id) {
                Some(state) if state.identity.attempt == *attempt => {
                    state.task.as_ref().is_some_and(|task| !task.is_finished())
                }
                _ => return,
            }
        };
        if !in_flight {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // the attempt task removes the cache entry itself when it loses the
    // finish line; only a runtime that made it to Running is left for us
    match inner.coord.get(workspace_id).await {
        Ok(Some(entry)) if entry.status == WorkspaceStatus::Stopping && entry.attempt == *attempt => {}
        _ => return,
    }
    let state = {
        let mut attempts = inner.attempts.lock();
        match attempts.get(workspace_id) {
            Some(state) if state.identity.attempt == *attempt => attempts.remove(workspace_id),
            _ => None,
        }
    };
    let Some(state) = state else {
        return;
    };

    let handle = state.handle.lock().take();
    if let Some(handle) = handle {
        if let Err(err) = inner.adapter.stop(&handle).await {
            tracing::warn!(%workspace_id, error = %err, "backend stop failed");
        }
        if let Err(err) = inner.adapter.destroy(&handle).await {
            tracing::warn!(%workspace_id, error = %err, "backend destroy failed");
        }
    }
    if let Err(err) = inner.coord.remove(workspace_id).await {
        tracing::warn!(%workspace_id, error = %err, "cache remove failed");
    }
    let _ = inner.coord.forget(workspace_id).await;
    let _ = inner.events.send(Event::StatusChanged {
        workspace_id: workspace_id.clone(),
        old: WorkspaceStatus::Stopping,
        new: WorkspaceStatus::Stopped,
        epoch_ms: inner.clock.epoch_ms(),
        reason: None,
        error: None,
    });
    tracing::info!(%workspace_id, "peer-requested stop converged");
}

async fn run_attempt<I, C, R, K>(
    inner: Arc<Inner<I, C, R, K>>,
    config: WorkspaceConfig,
    identity: RuntimeIdentity,
    cancel: CancelFlag,
    slot: Arc<Mutex<Option<RuntimeHandle>>>,
) where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    let workspace_id = identity.workspace_id.clone();
    let result = drive_start(&inner, &config, &identity, &cancel, &slot).await;

    match result {
        Ok(()) => {
            let now = inner.clock.epoch_ms();
            if commit_running(&inner, &identity, now).await && !cancel.is_cancelled() {
                let _ = inner.coord.record(&workspace_id, now).await;
                let _ = inner.events.send(Event::StatusChanged {
                    workspace_id,
                    old: WorkspaceStatus::Starting,
                    new: WorkspaceStatus::Running,
                    epoch_ms: now,
                    reason: None,
                    error: None,
                });
                tracing::info!(runtime = %identity, "runtime running");
            } else {
                // a stop overtook us at the finish line
                finish_failed_attempt(&inner, &identity, &slot, None).await;
            }
        }
        Err(err) => {
            let error = match &err {
                RuntimeError::Interrupted { .. }
                | RuntimeError::Infrastructure(InfraError::Interrupted) => None,
                other => Some(other.to_string()),
            };
            if error.is_some() {
                tracing::warn!(runtime = %identity, error = %err, "start failed");
            } else {
                tracing::info!(runtime = %identity, "start interrupted");
            }
            finish_failed_attempt(&inner, &identity, &slot, error).await;
        }
    }
}

/// Publish `Starting` -> `Running` for a completed attempt, under the same
/// per-workspace lock every other transition takes so a concurrent stop is
/// fully ordered with the commit: either its `Stopping` entry lands first
/// and the commit is abandoned, or the stop observes `Running` afterwards.
async fn commit_running<I, C, R, K>(
    inner: &Arc<Inner<I, C, R, K>>,
    identity: &RuntimeIdentity,
    now: u64,
) -> bool
where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    let workspace_id = &identity.workspace_id;
    let _guard = match inner
        .coord
        .acquire(workspace_id, &inner.config.node, inner.config.lock_wait)
        .await
    {
        Ok(guard) => guard,
        Err(err) => {
            tracing::info!(%workspace_id, error = %err, "lock unavailable at start completion");
            return false;
        }
    };
    let still_ours = matches!(
        inner.coord.get(workspace_id).await,
        Ok(Some(entry))
            if entry.attempt == identity.attempt
                && entry.status.can_transition_to(WorkspaceStatus::Running)
    );
    still_ours
        && inner
            .coord
            .put(
                workspace_id,
                StatusEntry {
                    status: WorkspaceStatus::Running,
                    node: inner.config.node.clone(),
                    epoch_ms: now,
                    attempt: identity.attempt.clone(),
                },
            )
            .await
            .unwrap_or(false)
}

/// Tear down a failed or interrupted attempt and publish the final
/// `Stopped`. Cleanup is best effort: backend failures are logged, never
/// propagated, so a runtime cannot get stuck half-stopped.
async fn finish_failed_attempt<I, C, R, K>(
    inner: &Arc<Inner<I, C, R, K>>,
    identity: &RuntimeIdentity,
    slot: &Arc<Mutex<Option<RuntimeHandle>>>,
    error: Option<String>,
) where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    let workspace_id = identity.workspace_id.clone();
    let handle = slot.lock().take();
    if let Some(handle) = handle {
        if let Err(err) = inner.adapter.destroy(&handle).await {
            tracing::warn!(runtime = %identity, error = %err, "cleanup destroy failed");
        }
    }

    let old = match inner.coord.get(&workspace_id).await {
        Ok(Some(entry)) => entry.status,
        _ => WorkspaceStatus::Starting,
    };
    if let Err(err) = inner.coord.remove(&workspace_id).await {
        tracing::warn!(%workspace_id, error = %err, "cache remove failed");
    }
    let _ = inner.coord.forget(&workspace_id).await;

    let state = {
        let mut attempts = inner.attempts.lock();
        match attempts.get(&workspace_id) {
            // never claw back a newer attempt's state
            Some(state) if state.identity.attempt == identity.attempt => {
                attempts.remove(&workspace_id)
            }
            _ => None,
        }
    };
    if let Some(state) = state {
        if let Some(watcher) = state.watcher {
            watcher.abort();
        }
    }

    let _ = inner.events.send(Event::StatusChanged {
        workspace_id,
        old,
        new: WorkspaceStatus::Stopped,
        epoch_ms: inner.clock.epoch_ms(),
        reason: None,
        error,
    });
}

/// Parse, provision, realize, and wait for all machines to come up.
async fn drive_start<I, C, R, K>(
    inner: &Arc<Inner<I, C, R, K>>,
    config: &WorkspaceConfig,
    identity: &RuntimeIdentity,
    cancel: &CancelFlag,
    slot: &Arc<Mutex<Option<RuntimeHandle>>>,
) -> Result<(), RuntimeError>
where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    let workspace_id = identity.workspace_id.clone();
    let interrupted = || RuntimeError::Interrupted {
        workspace_id: workspace_id.clone(),
    };

    let internal = inner.factory.build(config)?;
    let mut env = inner.registry.parse(&internal.recipe, &internal.machines)?;
    let ctx = ProvisionContext {
        identity,
        environment: &internal,
    };
    inner.pipeline.provision(&ctx, &mut env, cancel)?;
    for warning in env.warnings() {
        tracing::warn!(runtime = %identity, %warning, "provisioning warning");
    }
    if cancel.is_cancelled() {
        return Err(interrupted());
    }

    let handle = inner.adapter.create(&env, identity).await?;
    *slot.lock() = Some(handle.clone());
    if cancel.is_cancelled() {
        return Err(interrupted());
    }
    inner.adapter.start(&handle, cancel).await?;

    // wait for every machine; the cache is re-checked so a stop from a
    // peer node interrupts the wait even if the cancel flag is late
    let deadline = tokio::time::Instant::now() + inner.config.start_timeout;
    loop {
        if cancel.is_cancelled() {
            return Err(interrupted());
        }
        match inner.coord.get(&workspace_id).await? {
            Some(entry)
                if entry.status == WorkspaceStatus::Starting
                    && entry.attempt == identity.attempt => {}
            _ => return Err(interrupted()),
        }

        let state = inner.adapter.status(&handle).await?;
        if state.all_running() {
            return Ok(());
        }
        if state.any_exited() {
            return Err(RuntimeError::Infrastructure(InfraError::Fatal(
                "a machine exited during startup".to_string(),
            )));
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(RuntimeError::Infrastructure(InfraError::Fatal(format!(
                "machines not running after {}s",
                inner.config.start_timeout.as_secs()
            ))));
        }
        tokio::time::sleep(inner.config.start_poll).await;
    }
}

#[cfg(test)]
#[path = "runtimes_tests.rs"]
mod tests;
