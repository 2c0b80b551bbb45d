// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Wharf daemon library
//!
//! Configuration and lifecycle for the `wharfd` binary: pid-file locking,
//! orchestrator wiring per backend, recovery at startup, graceful handover
//! at shutdown.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod lifecycle;

pub use config::{state_dir, Backend, Config};
pub use lifecycle::{startup, DaemonMonitor, DaemonRuntimes, DaemonState, LifecycleError};
