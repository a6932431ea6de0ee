// SPDX-License-Identifier: MPL-2.0

//! Rate sampling over cumulative byte counters
//!
//! A [`RateSampler`] repeatedly reads cumulative `(received, sent)` byte
//! counters from a [`CounterSource`], derives per-direction rates from the
//! delta against the previous read, and appends them to a bounded
//! [`RateSeries`]. Sampling callers (the periodic scheduler and any
//! on-demand refresh) serialize on one internal lock; readers get cloned
//! snapshots of the series and never block the sampler for long.
//!
//! Rates are single-interval instantaneous values, not moving averages:
//! `(Δbytes / Δseconds) / 1e6` MB/s.

use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, RwLock};
use std::time::Instant;

use crate::error::SampleError;

const BYTES_PER_MB: f64 = 1_000_000.0;

/// One read of the cumulative traffic counters.
#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub received_bytes: u64,
    pub sent_bytes: u64,
    pub taken_at: Instant,
}

/// Supplies cumulative traffic counters and the instant they were read.
///
/// Counters never decrease except on a genuine interface reset or
/// wraparound. Reads are expected to be cheap and local.
pub trait CounterSource {
    fn read(&mut self) -> io::Result<CounterSnapshot>;
}

/// A derived rate at one point in the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    /// Seconds since the series started.
    pub elapsed_secs: f64,
    pub receive_rate_mbps: f64,
    pub sent_rate_mbps: f64,
}

/// Bounded ring of rate points, ordered by elapsed time.
///
/// Appending past capacity evicts the oldest point, keeping memory flat for
/// a long-running process while preserving the most recent display window.
#[derive(Debug)]
pub struct RateSeries {
    points: VecDeque<RatePoint>,
    capacity: usize,
    started_at: Instant,
}

impl RateSeries {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            started_at: Instant::now(),
        }
    }

    /// Append a point, evicting the oldest when at capacity.
    pub fn append(&mut self, point: RatePoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Ordered copy of the series.
    pub fn snapshot(&self) -> Vec<RatePoint> {
        self.points.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<RatePoint> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seconds from the series start to `at`, saturating at zero.
    pub fn elapsed_since_start(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.started_at).as_secs_f64()
    }
}

struct SamplerState<S> {
    source: S,
    last: Option<CounterSnapshot>,
    last_rates: Option<(f64, f64)>,
}

/// Derives per-direction rates from consecutive counter snapshots.
///
/// The sampler is the sole writer of its baseline state and the sole
/// appender to its series. `sample()` callers are mutually exclusive;
/// series readers share a read lock over cloned data.
pub struct RateSampler<S> {
    state: Mutex<SamplerState<S>>,
    series: RwLock<RateSeries>,
}

impl<S: CounterSource> RateSampler<S> {
    pub fn new(source: S, history_capacity: usize) -> Self {
        Self {
            state: Mutex::new(SamplerState {
                source,
                last: None,
                last_rates: None,
            }),
            series: RwLock::new(RateSeries::new(history_capacity)),
        }
    }

    /// Take one counter snapshot and derive the rates since the previous one.
    ///
    /// The first successful call records a baseline and yields no point.
    /// A clock that failed to advance fails with
    /// [`SampleError::NonMonotonicTime`] and leaves the baseline untouched,
    /// so the next successful call recovers cleanly. A counter that moved
    /// backwards (reset or wraparound) clamps that direction's rate to zero
    /// for the interval instead of producing a negative value.
    pub fn sample(&self) -> Result<Option<RatePoint>, SampleError> {
        let mut state = self.state.lock().unwrap();

        let current = state
            .source
            .read()
            .map_err(SampleError::CounterSourceUnavailable)?;

        let Some(last) = state.last else {
            state.last = Some(current);
            return Ok(None);
        };

        let elapsed_secs = match current.taken_at.checked_duration_since(last.taken_at) {
            Some(delta) if !delta.is_zero() => delta.as_secs_f64(),
            _ => return Err(SampleError::NonMonotonicTime),
        };

        let receive_rate_mbps = rate_mbps(last.received_bytes, current.received_bytes, elapsed_secs);
        let sent_rate_mbps = rate_mbps(last.sent_bytes, current.sent_bytes, elapsed_secs);

        let mut series = self.series.write().unwrap();
        let point = RatePoint {
            elapsed_secs: series.elapsed_since_start(current.taken_at),
            receive_rate_mbps,
            sent_rate_mbps,
        };
        series.append(point);
        drop(series);

        state.last = Some(current);
        state.last_rates = Some((receive_rate_mbps, sent_rate_mbps));
        Ok(Some(point))
    }

    /// Most recent successfully computed `(receive, sent)` rates in MB/s.
    ///
    /// `None` until the second successful sample. Display paths that need a
    /// "current" value read this instead of recomputing, so the plot and
    /// the text readout always agree.
    pub fn last_known_rates(&self) -> Option<(f64, f64)> {
        self.state.lock().unwrap().last_rates
    }

    /// Ordered copy of the series, safe to iterate while sampling continues.
    pub fn series_snapshot(&self) -> Vec<RatePoint> {
        self.series.read().unwrap().snapshot()
    }

    pub fn latest_point(&self) -> Option<RatePoint> {
        self.series.read().unwrap().latest()
    }
}

/// Delta-over-time in MB/s; a regressed counter yields zero.
fn rate_mbps(last: u64, current: u64, elapsed_secs: f64) -> f64 {
    if current < last {
        return 0.0;
    }
    (current - last) as f64 / elapsed_secs / BYTES_PER_MB
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct ScriptedSource {
        reads: VecDeque<io::Result<CounterSnapshot>>,
    }

    impl ScriptedSource {
        fn new(reads: Vec<io::Result<CounterSnapshot>>) -> Self {
            Self {
                reads: reads.into(),
            }
        }
    }

    impl CounterSource for ScriptedSource {
        fn read(&mut self) -> io::Result<CounterSnapshot> {
            self.reads.pop_front().expect("script exhausted")
        }
    }

    fn snap(base: Instant, secs: f64, received: u64, sent: u64) -> CounterSnapshot {
        CounterSnapshot {
            received_bytes: received,
            sent_bytes: sent,
            taken_at: base + Duration::from_secs_f64(secs),
        }
    }

    #[test]
    fn first_sample_records_baseline_without_a_point() {
        let base = Instant::now();
        let sampler = RateSampler::new(ScriptedSource::new(vec![Ok(snap(base, 0.0, 0, 0))]), 16);

        assert!(sampler.sample().unwrap().is_none());
        assert!(sampler.series_snapshot().is_empty());
        assert!(sampler.last_known_rates().is_none());
    }

    #[test]
    fn rate_is_delta_over_time_in_mbps() {
        let base = Instant::now();
        let sampler = RateSampler::new(
            ScriptedSource::new(vec![
                Ok(snap(base, 0.0, 0, 0)),
                Ok(snap(base, 2.0, 3_000_000, 500_000)),
            ]),
            16,
        );

        sampler.sample().unwrap();
        let point = sampler.sample().unwrap().unwrap();

        assert!((point.receive_rate_mbps - 1.5).abs() < 1e-9);
        assert!((point.sent_rate_mbps - 0.25).abs() < 1e-9);
        assert_eq!(sampler.last_known_rates(), Some((
            point.receive_rate_mbps,
            point.sent_rate_mbps,
        )));
    }

    #[test]
    fn stalled_clock_is_rejected_without_mutation() {
        let base = Instant::now();
        let sampler = RateSampler::new(
            ScriptedSource::new(vec![
                Ok(snap(base, 0.0, 1_000_000, 0)),
                Ok(snap(base, 0.0, 9_000_000, 0)),
                Ok(snap(base, 1.0, 3_000_000, 0)),
            ]),
            16,
        );

        sampler.sample().unwrap();
        assert!(matches!(
            sampler.sample(),
            Err(SampleError::NonMonotonicTime)
        ));
        assert!(sampler.series_snapshot().is_empty());
        assert!(sampler.last_known_rates().is_none());

        // Baseline still the first snapshot: 2 MB over 1 s.
        let point = sampler.sample().unwrap().unwrap();
        assert!((point.receive_rate_mbps - 2.0).abs() < 1e-9);
    }

    #[test]
    fn backward_clock_is_rejected() {
        let base = Instant::now();
        let sampler = RateSampler::new(
            ScriptedSource::new(vec![
                Ok(snap(base, 5.0, 0, 0)),
                Ok(snap(base, 4.0, 1_000_000, 0)),
            ]),
            16,
        );

        sampler.sample().unwrap();
        assert!(matches!(
            sampler.sample(),
            Err(SampleError::NonMonotonicTime)
        ));
    }

    #[test]
    fn counter_regression_clamps_to_zero() {
        let base = Instant::now();
        let sampler = RateSampler::new(
            ScriptedSource::new(vec![
                Ok(snap(base, 0.0, 1000, 4_000_000)),
                Ok(snap(base, 1.0, 10, 6_000_000)),
            ]),
            16,
        );

        sampler.sample().unwrap();
        let point = sampler.sample().unwrap().unwrap();

        assert_eq!(point.receive_rate_mbps, 0.0);
        assert!((point.sent_rate_mbps - 2.0).abs() < 1e-9);
    }

    #[test]
    fn source_failure_leaves_baseline_and_rates_intact() {
        let base = Instant::now();
        let sampler = RateSampler::new(
            ScriptedSource::new(vec![
                Ok(snap(base, 0.0, 0, 0)),
                Ok(snap(base, 1.0, 1_000_000, 0)),
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
                Ok(snap(base, 3.0, 5_000_000, 0)),
            ]),
            16,
        );

        sampler.sample().unwrap();
        sampler.sample().unwrap();
        assert!(matches!(
            sampler.sample(),
            Err(SampleError::CounterSourceUnavailable(_))
        ));
        // Display keeps degrading gracefully on the previous value.
        assert_eq!(sampler.last_known_rates(), Some((1.0, 0.0)));

        // Next read diffs against t=1: 4 MB over 2 s.
        let point = sampler.sample().unwrap().unwrap();
        assert!((point.receive_rate_mbps - 2.0).abs() < 1e-9);
    }

    #[test]
    fn series_evicts_oldest_at_capacity() {
        let mut series = RateSeries::new(3);
        for i in 0..5 {
            series.append(RatePoint {
                elapsed_secs: i as f64,
                receive_rate_mbps: i as f64,
                sent_rate_mbps: 0.0,
            });
        }

        let points = series.snapshot();
        assert_eq!(series.len(), 3);
        assert_eq!(
            points.iter().map(|p| p.elapsed_secs).collect::<Vec<_>>(),
            vec![2.0, 3.0, 4.0]
        );
        assert_eq!(series.latest().unwrap().elapsed_secs, 4.0);
    }

    #[test]
    fn elapsed_secs_is_non_decreasing() {
        let base = Instant::now();
        let mut reads = Vec::new();
        for i in 0..8u64 {
            reads.push(Ok(snap(base, i as f64 * 0.5, i * 1_000_000, i * 250_000)));
        }
        let sampler = RateSampler::new(ScriptedSource::new(reads), 16);
        for _ in 0..8 {
            sampler.sample().unwrap();
        }

        let points = sampler.series_snapshot();
        assert_eq!(points.len(), 7);
        for pair in points.windows(2) {
            assert!(pair[0].elapsed_secs <= pair[1].elapsed_secs);
        }
    }
}
