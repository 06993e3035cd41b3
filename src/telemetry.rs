//! Outbound telemetry line schema.
//!
//! Every device-to-host message is one JSON object per line, tagged with a
//! `"type"` field so the host can dispatch without context:
//!
//! ```text
//! {"type":"status","message":"BME280 connected at 0x76, battery monitor absent"}
//! {"type":"sensor","temp":21.4,"humidity":48.2,"pressure":1009.7,...}
//! {"type":"alert","message":"High temperature: 36.2 C"}
//! {"type":"ack","message":"LED turned on","led_state":true}
//! {"type":"error","message":"Invalid JSON command"}
//! ```
//!
//! The schema is the wire contract with the host application — field names
//! here must not change without coordinating both sides of the link.

use serde::{Deserialize, Serialize};

use crate::app::context::{DeviceContext, LinkStatus};
use crate::error::LinkError;
use crate::sensors::Reading;

/// One outbound telemetry line, tagged on `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Telemetry {
    /// Boot / probe outcome, human-readable.
    Status { message: String },
    /// A recognized command was applied; echoes the mutated field.
    Ack {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        led_state: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sleep_interval: Option<i64>,
    },
    /// Malformed or unknown command.
    Error { message: String },
    /// One periodic (or on-demand) sensor reading.
    Sensor(SensorFrame),
    /// Threshold alert, emitted after the sensor line it belongs to.
    Alert { message: String },
}

/// Wire form of a [`Reading`] plus the connectivity and LED state the host
/// needs to interpret it (`bme_connected=false` marks synthesized data).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorFrame {
    pub temp: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub motion: bool,
    pub battery: f32,
    /// Milliseconds since boot (wraps with the u32 uptime counter).
    pub timestamp: u32,
    pub bme_connected: bool,
    pub battery_connected: bool,
    pub led_state: bool,
}

impl SensorFrame {
    /// Build the wire frame for a reading under the current device context.
    pub fn from_reading(reading: &Reading, ctx: &DeviceContext) -> Self {
        Self {
            temp: reading.temperature_c,
            humidity: reading.humidity_pct,
            pressure: reading.pressure_hpa,
            motion: reading.motion_detected,
            battery: reading.battery_volts,
            timestamp: reading.uptime_ms,
            bme_connected: ctx.status.bme_connected,
            battery_connected: ctx.status.battery_connected,
            led_state: ctx.config.led_on,
        }
    }
}

/// Serialize a telemetry value to its JSON line (without the trailing
/// newline — the link adapter appends the terminator).
pub fn to_line(msg: &Telemetry) -> Result<String, LinkError> {
    serde_json::to_string(msg).map_err(|_| LinkError::Serialize)
}

impl Telemetry {
    /// Ack for an applied `led` command.
    pub fn led_ack(on: bool) -> Self {
        Self::Ack {
            message: format!("LED turned {}", if on { "on" } else { "off" }),
            led_state: Some(on),
            sleep_interval: None,
        }
    }

    /// Ack for an applied `config` command.
    pub fn config_ack(sleep_interval_secs: i64) -> Self {
        Self::Ack {
            message: format!("Sample interval set to {sleep_interval_secs} s"),
            led_state: None,
            sleep_interval: Some(sleep_interval_secs),
        }
    }
}

/// Boot status line describing the hardware probe outcome.
pub fn probe_status(status: &LinkStatus) -> Telemetry {
    let bme = match status.bme_address {
        Some(addr) => format!("BME280 connected at 0x{addr:02x}"),
        None => "BME280 not detected, using simulated readings".to_owned(),
    };
    let battery = if status.battery_connected {
        "present"
    } else {
        "absent"
    };
    Telemetry::Status {
        message: format!("{bme}, battery monitor {battery}"),
    }
}
