// SPDX-License-Identifier: MPL-2.0

//! Memory usage summary

use std::fmt;

use sysinfo::System;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Point-in-time memory figures, all in bytes.
#[derive(Debug, Clone, Copy)]
pub struct MemorySummary {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub used_percent: f32,
}

/// Reusable sysinfo handle refreshing memory data only.
pub struct MemoryMonitor {
    sys: System,
}

impl MemoryMonitor {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self { sys }
    }

    pub fn refresh(&mut self) -> MemorySummary {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        MemorySummary {
            total,
            available: self.sys.available_memory(),
            used,
            used_percent: if total > 0 {
                (used as f64 / total as f64 * 100.0) as f32
            } else {
                0.0
            },
        }
    }
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory: {:.2} GB used / {:.2} GB total ({:.1}%), {:.2} GB available",
            self.used as f64 / GIB,
            self.total as f64 / GIB,
            self.used_percent,
            self.available as f64 / GIB,
        )
    }
}
