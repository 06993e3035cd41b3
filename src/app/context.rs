//! Shared mutable device state, bundled into one explicit value.
//!
//! `DeviceContext` is owned by the device service and passed by reference
//! wherever state is needed — there are no process-wide singletons. It
//! holds the runtime configuration, the boot-time connectivity flags, and
//! the most recent reading.

use crate::config::DeviceConfig;
use crate::sensors::Reading;

/// Hardware connectivity, probed once during initialization.
///
/// Write-once per boot cycle: after the probe these flags never change
/// until a full restart re-probes the hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatus {
    /// The BME280 responded at one of the probed I2C addresses.
    pub bme_connected: bool,
    /// Which address answered, for the boot status message.
    pub bme_address: Option<u8>,
    /// A battery voltage divider is present on the ADC pin.
    pub battery_connected: bool,
}

/// All mutable device state threaded through the tick loop.
pub struct DeviceContext {
    /// Runtime configuration (mutated only by host commands).
    pub config: DeviceConfig,
    /// Boot-time hardware connectivity.
    pub status: LinkStatus,
    /// Most recent reading, kept for on-demand status requests.
    pub last_reading: Option<Reading>,
}

impl DeviceContext {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            status: LinkStatus::default(),
            last_reading: None,
        }
    }
}
