// SPDX-License-Identifier: MPL-2.0

//! Runtime configuration
//!
//! Loaded from a JSON file named by `NETRATE_CONFIG`, falling back to
//! `netrate-monitor.json` in the working directory, falling back to
//! defaults. Configuration problems never abort startup.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;
const DEFAULT_HISTORY_CAPACITY: usize = 600;

const CONFIG_ENV: &str = "NETRATE_CONFIG";
const CONFIG_FILE: &str = "netrate-monitor.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between automatic samples.
    pub sample_interval_ms: u64,
    /// Rate points retained before the oldest is evicted.
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    /// Load from the configured path, falling back to defaults on any
    /// missing or malformed file.
    pub fn load() -> Self {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        match Self::read_from(&path) {
            Ok(config) => config,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("ignoring config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn read_from(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(io::Error::other)
    }

    /// The sampling cadence, clamped away from zero.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_one_second_and_ten_minutes() {
        let config = Config::default();
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
        assert_eq!(config.history_capacity, 600);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: Config = serde_json::from_str(r#"{"sample_interval_ms": 250}"#).unwrap();
        assert_eq!(config.sample_interval(), Duration::from_millis(250));
        assert_eq!(config.history_capacity, 600);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = Config {
            sample_interval_ms: 0,
            ..Config::default()
        };
        assert!(!config.sample_interval().is_zero());
    }
}
