// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Activity tracking and idle expiry.
//!
//! `record_activity` stands between request handlers and the shared
//! activity store: workspace traffic arrives in bursts, so writes are
//! coalesced through a local shadow of the last write time and at most one
//! cache write happens per threshold window. The sweep loop expires
//! runtimes that idled past their timeout or outlived the run timeout;
//! sweep failures are logged and never kill the loop.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use wharf_coord::Coordinator;
use wharf_core::{Clock, Event, SystemClock, WorkspaceId, WorkspaceStatus};
use wharf_env::RecipeRetriever;
use wharf_infra::InfraAdapter;

use crate::error::RuntimeError;
use crate::runtimes::Runtimes;

/// Reason attached to stops triggered by idle expiry.
pub const IDLE_TIMEOUT_REASON: &str = "idle timeout exceeded";

/// Reason attached to stops triggered by the run timeout.
pub const RUN_TIMEOUT_REASON: &str = "run timeout exceeded";

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Minimum spacing between cache writes for one workspace's activity.
    pub threshold: Duration,
    /// Stop runtimes idle for longer than this. `None` disables idle expiry.
    pub idle_timeout: Option<Duration>,
    /// Stop runtimes running for longer than this, active or not.
    pub run_timeout: Option<Duration>,
    /// Interval between sweeps.
    pub sweep_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_millis(200),
            idle_timeout: Some(Duration::from_secs(30 * 60)),
            run_timeout: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Tracks activity and expires idle runtimes.
pub struct ActivityMonitor<I, C, R, K = SystemClock> {
    runtimes: Runtimes<I, C, R, K>,
    coord: C,
    clock: K,
    config: MonitorConfig,
    /// Last cache write per workspace; local only, peers read the store.
    last_write: Mutex<HashMap<WorkspaceId, u64>>,
}

impl<I, C, R, K> ActivityMonitor<I, C, R, K>
where
    I: InfraAdapter,
    C: Coordinator,
    R: RecipeRetriever + 'static,
    K: Clock,
{
    pub fn new(runtimes: Runtimes<I, C, R, K>, coord: C, clock: K, config: MonitorConfig) -> Self {
        Self {
            runtimes,
            coord,
            clock,
            config,
            last_write: Mutex::new(HashMap::new()),
        }
    }

    /// Record user activity, coalescing bursts into one cache write per
    /// threshold window.
    pub async fn record_activity(&self, workspace_id: &WorkspaceId) -> Result<(), RuntimeError> {
        let now = self.clock.epoch_ms();
        let write = {
            let mut last_write = self.last_write.lock();
            match last_write.get(workspace_id) {
                Some(last) if now.saturating_sub(*last) < self.config.threshold.as_millis() as u64 => {
                    false
                }
                _ => {
                    last_write.insert(workspace_id.clone(), now);
                    true
                }
            }
        };
        if write {
            self.coord.record(workspace_id, now).await?;
            self.runtimes.publish(Event::ActivityRecorded {
                workspace_id: workspace_id.clone(),
                epoch_ms: now,
            });
        }
        Ok(())
    }

    /// One expiry pass over the shared state.
    pub async fn sweep(&self) -> Result<(), RuntimeError> {
        let now = self.clock.epoch_ms();
        let snapshot = self.coord.snapshot().await?;

        if let Some(idle_timeout) = self.config.idle_timeout {
            for workspace_id in self.coord.expired(idle_timeout, now).await? {
                let running = snapshot
                    .get(&workspace_id)
                    .is_some_and(|entry| entry.status == WorkspaceStatus::Running);
                if !running {
                    continue;
                }
                tracing::info!(%workspace_id, "idle timeout exceeded, stopping");
                if let Err(err) = self
                    .runtimes
                    .stop(&workspace_id, Some(IDLE_TIMEOUT_REASON.to_string()))
                    .await
                {
                    tracing::warn!(%workspace_id, error = %err, "idle expiry stop failed");
                }
            }
        }

        if let Some(run_timeout) = self.config.run_timeout {
            let limit = run_timeout.as_millis() as u64;
            for (workspace_id, entry) in &snapshot {
                if entry.status != WorkspaceStatus::Running
                    || now.saturating_sub(entry.epoch_ms) < limit
                {
                    continue;
                }
                tracing::info!(%workspace_id, "run timeout exceeded, stopping");
                if let Err(err) = self
                    .runtimes
                    .stop(workspace_id, Some(RUN_TIMEOUT_REASON.to_string()))
                    .await
                {
                    tracing::warn!(%workspace_id, error = %err, "run expiry stop failed");
                }
            }
        }
        Ok(())
    }

    /// Sweep forever. Spawned by the daemon; aborted at shutdown.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = self.sweep().await {
                tracing::warn!(error = %err, "activity sweep failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
