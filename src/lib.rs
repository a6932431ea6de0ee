// SPDX-License-Identifier: MPL-2.0

//! Host telemetry sampling with windowed network rate derivation
//!
//! The core of this crate turns cumulative network byte counters, read at
//! irregular wall-clock intervals, into a bounded, time-ordered series of
//! instantaneous rates (MB/s) that is safe to read while sampling continues.
//! Around it sit thin collaborators: a periodic scheduler, memory and
//! storage summaries, and host identity lookup.

pub mod config;
pub mod error;
pub mod monitor;
pub mod sampler;
pub mod scheduler;

pub use config::Config;
pub use error::SampleError;
pub use sampler::{CounterSnapshot, CounterSource, RatePoint, RateSampler, RateSeries};
pub use scheduler::Scheduler;
