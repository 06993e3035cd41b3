//! Device configuration parameters
//!
//! The tunable state of the sensor node. Both fields are mutated only by
//! command handling in response to `config` / `led` commands from the host;
//! a full restart resets them to defaults.

use serde::{Deserialize, Serialize};

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Interval between periodic sensor readings (milliseconds, always > 0).
    pub sample_interval_ms: u32,
    /// Whether the status LED is commanded on.
    pub led_on: bool,
}

impl DeviceConfig {
    /// Default sampling cadence: one reading every 5 seconds.
    pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 5000;

    /// Apply a `sleep_interval` value (seconds) from a host `config` command.
    ///
    /// The wire unit is seconds; internally the cadence is milliseconds.
    /// Zero, negative, and overflowing values are rejected, not applied —
    /// the sampling interval must stay strictly positive. Returns whether
    /// the value was applied.
    pub fn apply_sleep_interval_secs(&mut self, secs: i64) -> bool {
        match secs.checked_mul(1000) {
            Some(ms) if ms > 0 && ms <= i64::from(u32::MAX) => {
                self.sample_interval_ms = ms as u32;
                true
            }
            _ => false,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: Self::DEFAULT_SAMPLE_INTERVAL_MS,
            led_on: false,
        }
    }
}
