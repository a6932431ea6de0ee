// SPDX-License-Identifier: MPL-2.0

//! Host telemetry collaborators
//!
//! Thin wrappers around OS data: ask the OS, summarize the answer. The
//! sampling core in [`crate::sampler`] only depends on the counter source.

pub mod identity;
pub mod memory;
pub mod network;
pub mod storage;

pub use identity::{HostIdentity, host_identity};
pub use memory::{MemoryMonitor, MemorySummary};
pub use network::SystemCounterSource;
pub use storage::{PartitionSummary, StorageMonitor};
