// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wharf-engine: workspace runtime orchestration.
//!
//! Ties the environment layer, the infrastructure adapter, and the
//! coordination backend together: `Runtimes` drives the status state
//! machine for every workspace, the provisioner pipeline prepares
//! environments before realization, and `ActivityMonitor` expires idle
//! runtimes.

mod error;
#[cfg(test)]
mod test_util;
mod monitor;
pub mod provision;
mod runtimes;

pub use error::RuntimeError;
pub use monitor::{ActivityMonitor, MonitorConfig, IDLE_TIMEOUT_REASON, RUN_TIMEOUT_REASON};
pub use provision::{default_pipeline, ProvisionContext, Provisioner, ProvisionerPipeline};
pub use runtimes::{Runtimes, RuntimesConfig};
