//! Port traits — the boundary between device logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceService (domain)
//! ```
//!
//! Platform adapters (real ESP32 peripherals, the host simulator, test
//! mocks) implement these traits. The service consumes them via generics,
//! so the domain core never touches hardware directly.

use crate::error::LinkError;
use crate::telemetry::Telemetry;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the node's sensors.
///
/// The environmental methods mirror the vendor BME280 driver surface
/// (`begin(address)`, temperature/humidity/pressure getters); the read
/// methods are only called after `begin` has succeeded at some address.
pub trait SensorPort {
    /// Probe the environmental sensor at the given I2C address.
    fn begin(&mut self, address: u8) -> bool;

    /// Latest temperature in °C.
    fn read_temperature(&mut self) -> f32;

    /// Latest relative humidity in %.
    fn read_humidity(&mut self) -> f32;

    /// Latest barometric pressure in hPa.
    fn read_pressure(&mut self) -> f32;

    /// Whether the motion input is currently asserted.
    fn motion_detected(&mut self) -> bool;

    /// Probe for a battery voltage divider on the ADC pin.
    fn battery_connected(&mut self) -> bool;

    /// Battery voltage in volts. Only meaningful when
    /// [`battery_connected`](Self::battery_connected) reported `true`.
    fn read_battery_volts(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait ActuatorPort {
    /// Drive the status LED.
    fn set_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Serial link ports (host ↔ device)
// ───────────────────────────────────────────────────────────────

/// Non-blocking inbound byte stream.
///
/// `poll_byte` must never block: a byte either is available this tick or
/// it is not. Blocking here would stall the sampling cadence.
pub trait LinkRx {
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Outbound telemetry line consumer.
///
/// Adapters serialize the value to its JSON line and write it to the
/// transport. A failed write is reported, not fatal — the tick loop logs
/// and continues.
pub trait TelemetrySink {
    fn emit(&mut self, msg: &Telemetry) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
///
/// Deliberately `u32`: the counter wraps roughly every 49 days, and all
/// cadence arithmetic uses wrapping subtraction so the rollover is
/// harmless.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}
