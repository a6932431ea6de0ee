// SPDX-License-Identifier: MPL-2.0

//! Console readout for the telemetry sampler
//!
//! Wires the rate sampler to the periodic scheduler and logs the latest
//! rates on each tick. `SIGUSR1` forces an immediate sample and emits the
//! full host summary (identity, rates, memory, storage). `RUST_LOG`
//! controls verbosity.

use std::sync::Arc;

use log::{info, warn};

use netrate_monitor::config::Config;
use netrate_monitor::monitor::{MemoryMonitor, StorageMonitor, SystemCounterSource, host_identity};
use netrate_monitor::sampler::RateSampler;
use netrate_monitor::scheduler::Scheduler;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::load();
    let sampler = Arc::new(RateSampler::new(
        SystemCounterSource::new(),
        config.history_capacity,
    ));

    let tick_sampler = Arc::clone(&sampler);
    let scheduler = Scheduler::spawn(config.sample_interval(), move || {
        tick_sampler.sample().map(|point| {
            if let Some(point) = point {
                info!(
                    "incoming {:.2} MB/s, outgoing {:.2} MB/s at {:.0}s",
                    point.receive_rate_mbps, point.sent_rate_mbps, point.elapsed_secs
                );
            }
        })
    });

    #[cfg(unix)]
    spawn_refresh_listener(Arc::clone(&sampler));

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to wait for shutdown signal: {err}");
    }
    info!("shutting down");
    scheduler.shutdown().await;
}

/// Forced refresh: sample immediately and emit the full text summary.
#[cfg(unix)]
fn spawn_refresh_listener(sampler: Arc<RateSampler<SystemCounterSource>>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut usr1 = match signal(SignalKind::user_defined1()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!("refresh signal unavailable: {err}");
                return;
            }
        };
        let mut memory = MemoryMonitor::new();
        let mut storage = StorageMonitor::new();

        while usr1.recv().await.is_some() {
            if let Err(err) = sampler.sample() {
                warn!("forced sample skipped: {err}");
            }
            log_summary(&sampler, &mut memory, &mut storage);
        }
    });
}

#[cfg(unix)]
fn log_summary(
    sampler: &RateSampler<SystemCounterSource>,
    memory: &mut MemoryMonitor,
    storage: &mut StorageMonitor,
) {
    info!("{}", host_identity());
    match sampler.last_known_rates() {
        Some((receive, sent)) => {
            info!("incoming {receive:.2} MB/s, outgoing {sent:.2} MB/s");
        }
        None => info!("rates not yet available"),
    }
    info!("{}", memory.refresh());
    for partition in storage.refresh() {
        info!("{partition}");
    }
}
