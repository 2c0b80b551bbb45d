// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! wharf-infra: infrastructure adapters.
//!
//! Each adapter translates the neutral container environment into its
//! backend's native objects and is the only component that talks to the
//! backend. All adapters here drive the backend CLI (`docker`, `kubectl`,
//! `oc`) through timeout-wrapped subprocesses.

mod adapter;
mod backoff;
mod docker;
mod error;
mod handle;
mod kubernetes;
mod openshift;
pub mod subprocess;
mod traced;

pub use adapter::InfraAdapter;
pub use backoff::{with_retry, RetryPolicy};
pub use docker::DockerAdapter;
pub use error::InfraError;
pub use handle::{MachineState, RuntimeHandle, RuntimeState};
pub use kubernetes::KubernetesAdapter;
pub use openshift::OpenshiftAdapter;
pub use traced::TracedInfra;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInfraAdapter, InfraCall};
