//! Property tests for the protocol and evaluation layers.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use envnode::alerts::{self, Alert};
use envnode::app::context::LinkStatus;
use envnode::config::DeviceConfig;
use envnode::link::command::Command;
use envnode::link::framer::{LineFramer, MAX_FRAME_LEN};
use envnode::sensors::{Reading, SensorSampler};
use proptest::prelude::*;

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        -50.0f32..=80.0,
        0.0f32..=100.0,
        800.0f32..=1200.0,
        any::<bool>(),
        0.0f32..=5.0,
        any::<u32>(),
    )
        .prop_map(
            |(temperature_c, humidity_pct, pressure_hpa, motion_detected, battery_volts, uptime_ms)| {
                Reading {
                    temperature_c,
                    humidity_pct,
                    pressure_hpa,
                    motion_detected,
                    battery_volts,
                    uptime_ms,
                }
            },
        )
}

fn arb_status() -> impl Strategy<Value = LinkStatus> {
    (any::<bool>(), any::<bool>()).prop_map(|(bme, battery)| LinkStatus {
        bme_connected: bme,
        bme_address: bme.then_some(0x76),
        battery_connected: battery,
    })
}

// ── Line framer robustness ────────────────────────────────────

proptest! {
    /// Arbitrary byte soup must never panic the framer, and every frame it
    /// yields obeys the length bound and carries no surrounding whitespace.
    #[test]
    fn framer_survives_arbitrary_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..=4096),
    ) {
        let mut framer = LineFramer::new();
        for byte in data {
            if let Some(frame) = framer.feed(byte) {
                prop_assert!(!frame.is_empty());
                prop_assert!(frame.len() <= MAX_FRAME_LEN);
                prop_assert_eq!(frame.trim(), frame.as_str());
            }
        }
    }

    /// Newline-free input can never produce a frame, regardless of length.
    #[test]
    fn no_terminator_no_frame(
        data in proptest::collection::vec(any::<u8>().prop_filter("no newline", |b| *b != b'\n'), 0..=3000),
    ) {
        let mut framer = LineFramer::new();
        for byte in data {
            prop_assert_eq!(framer.feed(byte), None);
        }
    }
}

// ── Command parsing totality ──────────────────────────────────

proptest! {
    /// Any string maps to exactly one command — parsing never panics.
    #[test]
    fn parse_is_total(frame in ".*") {
        let _ = Command::parse(&frame);
    }

    /// Whatever the payload, a well-formed reset frame stays a reset.
    #[test]
    fn reset_parses_regardless_of_extra_fields(extra in 0i64..=1000) {
        let frame = format!(r#"{{"type":"reset","extra":{extra}}}"#);
        prop_assert_eq!(Command::parse(&frame), Command::Reset);
    }
}

// ── Alert evaluation ──────────────────────────────────────────

proptest! {
    /// Pure and idempotent: the same inputs always produce the same alerts.
    #[test]
    fn evaluate_is_idempotent(reading in arb_reading(), status in arb_status()) {
        let first = alerts::evaluate(&reading, &status);
        let second = alerts::evaluate(&reading, &status);
        prop_assert_eq!(first.as_slice(), second.as_slice());
    }

    /// No battery divider — no low-battery alert, whatever the voltage.
    #[test]
    fn absent_battery_never_alerts(reading in arb_reading()) {
        let status = LinkStatus {
            bme_connected: true,
            bme_address: Some(0x76),
            battery_connected: false,
        };
        let alerts = alerts::evaluate(&reading, &status);
        prop_assert!(!alerts.iter().any(|a| matches!(a, Alert::LowBattery { .. })), "unexpected low-battery alert");
    }

    /// Alerts appear in the documented stable order.
    #[test]
    fn alert_order_is_battery_temperature_pressure(
        reading in arb_reading(),
        status in arb_status(),
    ) {
        let rank = |a: &Alert| match a {
            Alert::LowBattery { .. } => 0,
            Alert::HighTemperature { .. } => 1,
            Alert::UnusualPressure { .. } => 2,
        };
        let alerts = alerts::evaluate(&reading, &status);
        let ranks: Vec<u8> = alerts.iter().map(rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);
    }
}

// ── Cadence arithmetic across the u32 rollover ────────────────

proptest! {
    /// `due` depends only on the elapsed span, wherever the counter sits —
    /// including spans that straddle the u32 wraparound boundary.
    #[test]
    fn due_is_wraparound_safe(
        last in any::<u32>(),
        elapsed in 0u32..=86_400_000, // up to a day
        interval in 1u32..=3_600_000,
    ) {
        let config = DeviceConfig {
            sample_interval_ms: interval,
            led_on: false,
        };
        let mut sampler = SensorSampler::new(0);
        sampler.mark(last);
        let now = last.wrapping_add(elapsed);
        prop_assert_eq!(sampler.due(now, &config), elapsed >= interval);
    }
}
