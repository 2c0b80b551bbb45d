// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Daemon configuration.
//!
//! Settings come from `config.toml` in the state directory, merged over
//! built-in defaults. Missing file means all defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use wharf_core::NodeId;
use wharf_engine::{MonitorConfig, RuntimesConfig};
use wharf_infra::RetryPolicy;

use crate::lifecycle::LifecycleError;

/// Which infrastructure backend the node drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Docker,
    Kubernetes,
    Openshift,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Docker => write!(f, "docker"),
            Backend::Kubernetes => write!(f, "kubernetes"),
            Backend::Openshift => write!(f, "openshift"),
        }
    }
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/wharf)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Infrastructure backend
    pub backend: Backend,
    /// This node's name on cache entries and locks
    pub node: NodeId,
    /// Infrastructure namespace runtimes are created in
    pub namespace: String,
    /// Stop runtimes idle for longer than this; `None` disables idle expiry
    pub idle_timeout: Option<Duration>,
    /// Stop runtimes running for longer than this, active or not
    pub run_timeout: Option<Duration>,
    /// Minimum spacing between activity cache writes per workspace
    pub activity_threshold: Duration,
    /// Interval between monitor sweeps
    pub sweep_interval: Duration,
    /// Bound on waiting for a per-workspace lock
    pub lock_wait: Duration,
    /// Backend retry budget, including the first attempt
    pub retry_attempts: u32,
}

/// On-disk shape: every field optional, absent fields take defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    backend: Option<Backend>,
    node: Option<String>,
    namespace: Option<String>,
    /// 0 disables idle expiry
    idle_timeout_secs: Option<u64>,
    /// 0 (or absent) disables the run timeout
    run_timeout_secs: Option<u64>,
    activity_threshold_ms: Option<u64>,
    sweep_interval_secs: Option<u64>,
    lock_wait_ms: Option<u64>,
    retry_attempts: Option<u32>,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// One daemon serves one node; the state directory holds the pid file,
    /// the log, and `config.toml`.
    pub fn load() -> Result<Self, LifecycleError> {
        Self::load_from(state_dir()?)
    }

    /// Load configuration rooted at an explicit state directory.
    pub fn load_from(state_dir: PathBuf) -> Result<Self, LifecycleError> {
        let config_path = state_dir.join("config.toml");
        let file = if config_path.exists() {
            let text = std::fs::read_to_string(&config_path)?;
            toml::from_str(&text).map_err(|e| LifecycleError::InvalidConfig(e.to_string()))?
        } else {
            FileConfig::default()
        };
        Ok(Self::resolve(file, state_dir))
    }

    fn resolve(file: FileConfig, state_dir: PathBuf) -> Self {
        // Per-process default so two daemons on one host get distinct names.
        let node = file.node.unwrap_or_else(|| {
            let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "wharf".to_string());
            format!("{host}-{}", std::process::id())
        });
        Self {
            lock_path: state_dir.join("wharfd.pid"),
            log_path: state_dir.join("wharfd.log"),
            state_dir,
            backend: file.backend.unwrap_or(Backend::Docker),
            node: NodeId::from(node),
            namespace: file.namespace.unwrap_or_else(|| "wharf".to_string()),
            idle_timeout: match file.idle_timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => Some(Duration::from_secs(30 * 60)),
            },
            run_timeout: match file.run_timeout_secs {
                None | Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
            },
            activity_threshold: Duration::from_millis(file.activity_threshold_ms.unwrap_or(200)),
            sweep_interval: Duration::from_secs(file.sweep_interval_secs.unwrap_or(60)),
            lock_wait: Duration::from_millis(file.lock_wait_ms.unwrap_or(500)),
            retry_attempts: file.retry_attempts.unwrap_or(4),
        }
    }

    /// Orchestrator settings derived from this configuration.
    pub fn runtimes(&self) -> RuntimesConfig {
        RuntimesConfig {
            node: self.node.clone(),
            namespace: self.namespace.clone(),
            lock_wait: self.lock_wait,
            ..RuntimesConfig::default()
        }
    }

    /// Activity monitor settings derived from this configuration.
    pub fn monitor(&self) -> MonitorConfig {
        MonitorConfig {
            threshold: self.activity_threshold,
            idle_timeout: self.idle_timeout,
            run_timeout: self.run_timeout,
            sweep_interval: self.sweep_interval,
        }
    }

    /// Backend retry budget derived from this configuration.
    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            ..RetryPolicy::default()
        }
    }
}

/// Resolve state directory: WHARF_STATE_DIR > XDG_STATE_HOME/wharf >
/// ~/.local/state/wharf
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("WHARF_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("wharf"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/wharf"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
