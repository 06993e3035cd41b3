//! Sensor subsystem — the periodic sampler and its data types.
//!
//! The sampler owns the cadence timer and the degraded-mode fallback. It
//! reads hardware through the [`SensorPort`] boundary, so the same code
//! drives the real BME280, the host simulator, and the test mocks.

pub mod synth;

use crate::app::context::LinkStatus;
use crate::app::ports::SensorPort;
use crate::config::DeviceConfig;
use synth::SyntheticEnv;

/// Standard BME280 I2C addresses probed at boot, in order.
pub const BME280_I2C_ADDR_PRIMARY: u8 = 0x76;
pub const BME280_I2C_ADDR_SECONDARY: u8 = 0x77;

/// One point-in-time environmental reading.
///
/// Created fresh each sampling tick and immutable afterwards; the device
/// context keeps the most recent one for on-demand status requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
    pub motion_detected: bool,
    /// 0.0 when no battery divider is connected.
    pub battery_volts: f32,
    /// Milliseconds since boot at sample time (wraps ≈ every 49 days).
    pub uptime_ms: u32,
}

/// Periodic sampler: cadence timer plus hardware/synthetic read paths.
pub struct SensorSampler {
    last_sample_ms: u32,
    synth: SyntheticEnv,
}

impl SensorSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            last_sample_ms: 0,
            synth: SyntheticEnv::new(seed),
        }
    }

    /// Whether a periodic sample is due at `now_ms`.
    ///
    /// Uses wrapping subtraction on the u32 millisecond counter: when the
    /// counter rolls over (≈49 days), `now - last` still yields the true
    /// elapsed span. This is the intended unsigned-arithmetic contract —
    /// do not "fix" it with signed math, which breaks at the boundary.
    pub fn due(&self, now_ms: u32, config: &DeviceConfig) -> bool {
        now_ms.wrapping_sub(self.last_sample_ms) >= config.sample_interval_ms
    }

    /// Restart the cadence timer from `now_ms`.
    ///
    /// Called for periodic samples only — an on-demand `status` reading is
    /// exempt from cadence and must not call this.
    pub fn mark(&mut self, now_ms: u32) {
        self.last_sample_ms = now_ms;
    }

    /// Take one reading.
    ///
    /// With the BME280 present, values come from the hardware driver;
    /// otherwise they are synthesized within the documented fallback
    /// bounds (and the emitted frame carries `bme_connected=false` so the
    /// host can tell the difference). Battery voltage is read only when a
    /// divider was detected at boot, else reported as 0.
    pub fn sample(
        &mut self,
        hw: &mut impl SensorPort,
        status: &LinkStatus,
        now_ms: u32,
    ) -> Reading {
        let (temperature_c, humidity_pct, pressure_hpa) = if status.bme_connected {
            (
                hw.read_temperature(),
                hw.read_humidity(),
                hw.read_pressure(),
            )
        } else {
            self.synth.next_env()
        };

        let battery_volts = if status.battery_connected {
            hw.read_battery_volts()
        } else {
            0.0
        };

        Reading {
            temperature_c,
            humidity_pct,
            pressure_hpa,
            motion_detected: hw.motion_detected(),
            battery_volts,
            uptime_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor;

    impl SensorPort for FixedSensor {
        fn begin(&mut self, _address: u8) -> bool {
            true
        }
        fn read_temperature(&mut self) -> f32 {
            21.0
        }
        fn read_humidity(&mut self) -> f32 {
            45.0
        }
        fn read_pressure(&mut self) -> f32 {
            1012.0
        }
        fn motion_detected(&mut self) -> bool {
            false
        }
        fn battery_connected(&mut self) -> bool {
            true
        }
        fn read_battery_volts(&mut self) -> f32 {
            3.9
        }
    }

    fn config(interval_ms: u32) -> DeviceConfig {
        DeviceConfig {
            sample_interval_ms: interval_ms,
            led_on: false,
        }
    }

    #[test]
    fn not_due_before_interval_elapses() {
        let mut sampler = SensorSampler::new(1);
        sampler.mark(1_000);
        assert!(!sampler.due(5_999, &config(5_000)));
        assert!(sampler.due(6_000, &config(5_000)));
    }

    #[test]
    fn due_check_survives_counter_wraparound() {
        let mut sampler = SensorSampler::new(1);
        sampler.mark(u32::MAX - 1_000);
        // 1 001 ms elapsed across the rollover: not yet due at 5 000 ms.
        assert!(!sampler.due(0, &config(5_000)));
        // 5 000 ms elapsed exactly: due.
        assert!(sampler.due(3_999, &config(5_000)));
    }

    #[test]
    fn hardware_path_reads_the_driver() {
        let mut sampler = SensorSampler::new(1);
        let status = LinkStatus {
            bme_connected: true,
            bme_address: Some(BME280_I2C_ADDR_PRIMARY),
            battery_connected: true,
        };
        let r = sampler.sample(&mut FixedSensor, &status, 500);
        assert_eq!(r.temperature_c, 21.0);
        assert_eq!(r.battery_volts, 3.9);
        assert_eq!(r.uptime_ms, 500);
    }

    #[test]
    fn degraded_path_synthesizes_in_bounds() {
        let mut sampler = SensorSampler::new(99);
        let status = LinkStatus::default();
        for _ in 0..1_000 {
            let r = sampler.sample(&mut FixedSensor, &status, 0);
            assert!((synth::TEMP_MIN_C..=synth::TEMP_MAX_C).contains(&r.temperature_c));
            assert!((synth::HUMIDITY_MIN_PCT..=synth::HUMIDITY_MAX_PCT).contains(&r.humidity_pct));
            assert!((synth::PRESSURE_MIN_HPA..=synth::PRESSURE_MAX_HPA).contains(&r.pressure_hpa));
        }
    }

    #[test]
    fn battery_reported_zero_without_divider() {
        let mut sampler = SensorSampler::new(1);
        let status = LinkStatus {
            bme_connected: true,
            bme_address: Some(BME280_I2C_ADDR_PRIMARY),
            battery_connected: false,
        };
        let r = sampler.sample(&mut FixedSensor, &status, 0);
        assert_eq!(r.battery_volts, 0.0);
    }
}
