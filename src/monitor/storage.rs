// SPDX-License-Identifier: MPL-2.0

//! Per-partition storage usage

use std::fmt;

use sysinfo::Disks;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Usage figures for one mounted partition, sizes in bytes.
#[derive(Debug, Clone)]
pub struct PartitionSummary {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f32,
}

/// Reusable sysinfo handle over the mounted disk list.
pub struct StorageMonitor {
    disks: Disks,
}

impl StorageMonitor {
    pub fn new() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
        }
    }

    pub fn refresh(&mut self) -> Vec<PartitionSummary> {
        self.disks.refresh();
        self.disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);
                PartitionSummary {
                    device: disk.name().to_string_lossy().into_owned(),
                    mount_point: disk.mount_point().display().to_string(),
                    fs_type: disk.file_system().to_string_lossy().into_owned(),
                    total,
                    used,
                    free,
                    used_percent: if total > 0 {
                        (used as f64 / total as f64 * 100.0) as f32
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }
}

impl Default for StorageMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartitionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "storage: {} on {} ({}): {:.2} GB used / {:.2} GB total ({:.1}%), {:.2} GB free",
            self.device,
            self.mount_point,
            self.fs_type,
            self.used as f64 / GIB,
            self.total as f64 / GIB,
            self.used_percent,
            self.free as f64 / GIB,
        )
    }
}
