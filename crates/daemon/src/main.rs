// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Wharf Daemon (wharfd)
//!
//! Background process that owns one node's workspace runtimes: it starts
//! and stops them through the configured backend, expires idle ones, and
//! hands ownership over to peers on shutdown.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use wharf_core::Event;
use wharf_daemon::config::{Backend, Config};
use wharf_daemon::lifecycle::{self, DaemonRuntimes, LifecycleError};
use wharf_infra::{DockerAdapter, InfraAdapter, KubernetesAdapter, OpenshiftAdapter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("wharfd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("wharfd {}", env!("CARGO_PKG_VERSION"));
                println!("Wharf Daemon - owns one node's workspace runtimes");
                println!();
                println!("USAGE:");
                println!("    wharfd");
                println!();
                println!("Configuration is read from config.toml in the state");
                println!("directory (WHARF_STATE_DIR, XDG_STATE_HOME/wharf, or");
                println!("~/.local/state/wharf).");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: wharfd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!(backend = %config.backend, node = %config.node, "starting wharfd");

    let result = match config.backend {
        Backend::Docker => run(&config, DockerAdapter::new().retry(config.retry())).await,
        Backend::Kubernetes => run(&config, KubernetesAdapter::new().retry(config.retry())).await,
        Backend::Openshift => run(&config, OpenshiftAdapter::new().retry(config.retry())).await,
    };

    drop(log_guard);
    result
}

/// Drive the daemon with a concrete backend adapter until a shutdown signal.
async fn run<I: InfraAdapter>(
    config: &Config,
    adapter: I,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = match lifecycle::startup(config, adapter).await {
        Ok(state) => state,
        Err(LifecycleError::LockFailed(_)) => {
            // Another daemon owns the state directory; print a human-readable
            // message instead of a raw debug error.
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("wharfd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("failed to start daemon: {e}");
            return Err(e.into());
        }
    };

    spawn_event_logger(&state.runtimes);

    // Sweep loop: idle expiry and run-timeout stops
    let monitor = Arc::clone(&state.monitor);
    let sweeper = tokio::spawn(async move { monitor.run().await });

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("daemon ready");

    // Signal ready for parent process (e.g., systemd, CLI waiting for startup)
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }

    sweeper.abort();
    state.shutdown().await?;
    Ok(())
}

/// Log every orchestration event with structured fields.
fn spawn_event_logger<I: InfraAdapter>(runtimes: &DaemonRuntimes<I>) {
    let mut events = runtimes.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::StatusChanged {
                    workspace_id,
                    old,
                    new,
                    reason,
                    error,
                    ..
                }) => {
                    if let Some(error) = error {
                        tracing::warn!(%workspace_id, %old, %new, error, "status changed");
                    } else {
                        tracing::info!(
                            %workspace_id,
                            %old,
                            %new,
                            reason = reason.as_deref().unwrap_or(""),
                            "status changed"
                        );
                    }
                }
                Ok(event) => {
                    tracing::info!(workspace_id = %event.workspace_id(), "{}", event.name());
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
