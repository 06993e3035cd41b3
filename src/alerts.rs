//! Alert threshold evaluation.
//!
//! Pure function over a reading and the boot-time connectivity flags; no
//! side effects and no mutation, so it is trivially unit-testable. Alerts
//! are emitted immediately after the sensor line they belong to and are
//! never queued.
//!
//! Evaluation order is fixed (battery, temperature, pressure) so that a
//! given reading always produces the same alert sequence on the wire.

use core::fmt;

use heapless::Vec;

use crate::app::context::LinkStatus;
use crate::sensors::Reading;

/// Battery voltage below this is a low-battery condition (volts).
pub const LOW_BATTERY_VOLTS: f32 = 3.3;
/// Temperature above this raises an alert (°C).
pub const HIGH_TEMPERATURE_C: f32 = 35.0;
/// Pressure outside this band is unusual weather (hPa).
pub const PRESSURE_LOW_HPA: f32 = 980.0;
pub const PRESSURE_HIGH_HPA: f32 = 1050.0;

/// A threshold alert, carrying the offending measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alert {
    LowBattery { volts: f32 },
    HighTemperature { celsius: f32 },
    UnusualPressure { hpa: f32 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowBattery { volts } => write!(f, "Low battery: {volts:.2} V"),
            Self::HighTemperature { celsius } => write!(f, "High temperature: {celsius:.1} C"),
            Self::UnusualPressure { hpa } => write!(f, "Unusual pressure: {hpa:.1} hPa"),
        }
    }
}

/// Evaluate every alert rule against one reading.
///
/// The battery rule is gated on `battery_connected`: a reading from a board
/// without a battery divider reports 0.0 V, which must not alert.
pub fn evaluate(reading: &Reading, status: &LinkStatus) -> Vec<Alert, 3> {
    let mut alerts = Vec::new();

    if status.battery_connected && reading.battery_volts < LOW_BATTERY_VOLTS {
        let _ = alerts.push(Alert::LowBattery {
            volts: reading.battery_volts,
        });
    }

    if reading.temperature_c > HIGH_TEMPERATURE_C {
        let _ = alerts.push(Alert::HighTemperature {
            celsius: reading.temperature_c,
        });
    }

    if reading.pressure_hpa < PRESSURE_LOW_HPA || reading.pressure_hpa > PRESSURE_HIGH_HPA {
        let _ = alerts.push(Alert::UnusualPressure {
            hpa: reading.pressure_hpa,
        });
    }

    alerts
}
