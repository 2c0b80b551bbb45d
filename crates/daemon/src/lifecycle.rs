// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Daemon lifecycle: startup, runtime recovery, graceful handover.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};
use wharf_coord::MemoryCoordinator;
use wharf_core::SystemClock;
use wharf_engine::{ActivityMonitor, RuntimeError, Runtimes};
use wharf_env::InlineOnlyRetriever;
use wharf_infra::{InfraAdapter, TracedInfra};

use crate::config::Config;

/// Orchestrator the daemon runs, generic over the backend adapter.
pub type DaemonRuntimes<I> =
    Runtimes<TracedInfra<I>, MemoryCoordinator, InlineOnlyRetriever, SystemClock>;

/// Activity monitor matching [`DaemonRuntimes`].
pub type DaemonMonitor<I> =
    ActivityMonitor<TracedInfra<I>, MemoryCoordinator, InlineOnlyRetriever, SystemClock>;

/// Daemon state during operation.
pub struct DaemonState<I: InfraAdapter> {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): held to keep the exclusive pid lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Workspace runtime orchestrator
    pub runtimes: DaemonRuntimes<I>,
    /// Activity tracking and idle expiry
    pub monitor: Arc<DaemonMonitor<I>>,
    /// When the daemon started
    pub start_time: Instant,
}

impl<I: InfraAdapter> std::fmt::Debug for DaemonState<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonState")
            .field("node", &self.config.node)
            .field("state_dir", &self.config.state_dir)
            .finish_non_exhaustive()
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Start the daemon: lock the pid file, wire the orchestrator, recover
/// runtimes the backend still reports.
pub async fn startup<I: InfraAdapter>(
    config: &Config,
    adapter: I,
) -> Result<DaemonState<I>, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let lock_file = acquire_pid_lock(&config.lock_path)?;

    let coord = MemoryCoordinator::new();
    let runtimes = Runtimes::new(
        TracedInfra::new(adapter),
        coord.clone(),
        InlineOnlyRetriever,
        SystemClock,
        config.runtimes(),
    );

    let recovered = runtimes.recover().await?;
    if !recovered.is_empty() {
        info!(count = recovered.len(), "re-registered runtimes reported by the backend");
    }

    let monitor = Arc::new(ActivityMonitor::new(
        runtimes.clone(),
        coord,
        SystemClock,
        config.monitor(),
    ));

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        runtimes,
        monitor,
        start_time: Instant::now(),
    })
}

/// Acquire the exclusive pid-file lock and write our pid into it.
///
/// Opened without truncation so a losing contender cannot wipe the running
/// daemon's pid before it holds the lock.
fn acquire_pid_lock(lock_path: &Path) -> Result<File, LifecycleError> {
    use std::io::Write;

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

impl<I: InfraAdapter> DaemonState<I> {
    /// Shut down gracefully: refuse new starts, publish a Stopping intent
    /// for every runtime this node owns, then drop the pid lock.
    ///
    /// Owned runtimes are intentionally left on the backend so a peer
    /// adopting them through the status cache sees them mid-shutdown
    /// instead of abandoned.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("shutting down daemon");

        self.runtimes.handover().await?;

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("failed to remove pid file: {e}");
            }
        }

        // Lock is released when self.lock_file drops.
        info!("daemon shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
