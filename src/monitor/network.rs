// SPDX-License-Identifier: MPL-2.0

//! Cumulative network counters via sysinfo

use std::io;
use std::time::Instant;

use sysinfo::Networks;

use crate::sampler::{CounterSnapshot, CounterSource};

/// Sums cumulative traffic across all network interfaces.
pub struct SystemCounterSource {
    networks: Networks,
}

impl SystemCounterSource {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SystemCounterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SystemCounterSource {
    fn read(&mut self) -> io::Result<CounterSnapshot> {
        self.networks.refresh();

        let mut received_bytes = 0;
        let mut sent_bytes = 0;
        for (_interface_name, network) in &self.networks {
            received_bytes += network.total_received();
            sent_bytes += network.total_transmitted();
        }

        Ok(CounterSnapshot {
            received_bytes,
            sent_bytes,
            taken_at: Instant::now(),
        })
    }
}
