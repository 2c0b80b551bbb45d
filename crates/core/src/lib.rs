// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wharf-core: domain model for workspace runtime orchestration

pub mod cancel;
pub mod clock;
pub mod config;
pub mod event;
pub mod id;
pub mod identity;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod warning;

pub use cancel::CancelFlag;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    MachineConfig, RecipeConfig, ServerConfig, WorkspaceConfig, MEMORY_LIMIT_ATTRIBUTE,
};
pub use event::Event;
pub use id::{AttemptId, IdGen, NodeId, OwnerId, UuidIdGen, WorkspaceId};
pub use identity::RuntimeIdentity;
pub use status::WorkspaceStatus;
pub use warning::{codes, Warning};
