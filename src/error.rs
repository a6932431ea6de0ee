// SPDX-License-Identifier: MPL-2.0

//! Sampling error taxonomy

use std::io;

use thiserror::Error;

/// Recoverable failures of one sampling attempt.
///
/// Neither variant invalidates the sampler: the tick that hit the error is
/// skipped and the previous baseline stays in place.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The clock did not advance between consecutive counter snapshots.
    #[error("counter timestamps did not advance between samples")]
    NonMonotonicTime,

    /// The underlying counter read failed.
    #[error("counter source unavailable")]
    CounterSourceUnavailable(#[source] io::Error),
}
