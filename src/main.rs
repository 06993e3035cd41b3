//! EnvNode Firmware — Main Entry Point
//!
//! Cooperative single-threaded tick loop over port-trait adapters:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │   EspBoard / SimBoard     EspLink / StdioLink     Clock      │
//! │   (Sensor+Actuator)       (LinkRx+TelemetrySink)             │
//! │                                                              │
//! │  ───────────────── Port Trait Boundary ─────────────────     │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            DeviceService (pure logic)                  │  │
//! │  │  framer · command dispatch · sampler · alerts          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each loop iteration performs one bounded unit of work and then yields
//! a short fixed slice — the node never busy-waits and never blocks on
//! serial input, so the sampling cadence holds regardless of host
//! traffic.
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use envnode::app::ports::{ActuatorPort, ClockPort, LinkRx, SensorPort, TelemetrySink};
use envnode::app::service::{DeviceService, TickOutcome};
use envnode::config::DeviceConfig;

/// Cooperative yield between ticks.
const TICK_SLICE_MS: u64 = 10;

/// Initialize the device and tick until a `reset` command ends the run.
fn run(
    service: &mut DeviceService,
    hw: &mut (impl SensorPort + ActuatorPort),
    link: &mut (impl LinkRx + TelemetrySink),
    clock: &impl ClockPort,
) {
    service.initialize(hw, link, clock);
    info!("entering tick loop ({TICK_SLICE_MS} ms slice)");
    loop {
        match service.tick(hw, link, clock) {
            TickOutcome::Continue => thread::sleep(Duration::from_millis(TICK_SLICE_MS)),
            TickOutcome::Restart => break,
        }
    }
}

// ── Host simulation entry ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use envnode::adapters::host::{HostClock, SimBoard, StdioLink};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvNode v{} (host simulation)     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let mut hw = SimBoard::from_env();
    let mut link = StdioLink::new();
    let clock = HostClock::new();
    let mut service = DeviceService::new(DeviceConfig::default());

    run(&mut service, &mut hw, &mut link, &clock);

    // Reset is modeled as a real process exit; a supervisor (or the
    // developer's shell loop) plays the role of the power cycle.
    info!("reset requested — exiting for restart");
    Ok(())
}

// ── ESP32 entry ───────────────────────────────────────────────

#[cfg(all(target_os = "espidf", feature = "espidf"))]
fn main() -> Result<()> {
    use envnode::adapters::esp::{self, EspBoard, EspClock, EspLink};
    use esp_idf_hal::gpio::IOPin;
    use esp_idf_hal::peripherals::Peripherals;

    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvNode v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let i2c = EspBoard::i2c_driver(
        peripherals.i2c0,
        peripherals.pins.gpio21.downgrade(),
        peripherals.pins.gpio22.downgrade(),
    )?;
    let mut hw = EspBoard::new(i2c)?;
    let mut link = EspLink::new()?;
    let clock = EspClock;
    let mut service = DeviceService::new(DeviceConfig::default());

    run(&mut service, &mut hw, &mut link, &clock);

    // A real restart: the chip reboots and the next run re-probes
    // hardware from scratch.
    esp::restart();
    Ok(())
}
