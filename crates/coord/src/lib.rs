// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wharf-coord: distributed coordination primitives.
//!
//! Nodes never trust each other's memory; the shared status cache is the
//! single source of truth for runtime states, the lock service serializes
//! per-workspace lifecycle operations, and the activity store backs idle
//! expiry. `MemoryCoordinator` implements all three over shared in-process
//! state; each node of a deployment holds a clone addressing the same
//! region, which is also how multi-node races are exercised in tests.

mod activity;
mod cache;
mod error;
mod lock;
mod memory;

pub use activity::ActivityStore;
pub use cache::{StatusCache, StatusEntry};
pub use error::CoordError;
pub use lock::{LockGuard, LockService};
pub use memory::MemoryCoordinator;

/// Everything the runtime engine needs from a coordination backend.
pub trait Coordinator: StatusCache + LockService + ActivityStore {}

impl<T: StatusCache + LockService + ActivityStore> Coordinator for T {}
