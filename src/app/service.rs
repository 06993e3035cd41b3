//! Device service — the cooperative tick core.
//!
//! Owns the device context, the line framer, and the sampler, and performs
//! one bounded unit of work per [`tick`](DeviceService::tick): poll the
//! link for at most one complete command frame, apply it, then take the
//! periodic sample if it is due. All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  LinkRx ──▶ ┌───────────────────────────┐ ──▶ TelemetrySink
//!             │       DeviceService        │
//!  SensorPort │  framer · commands · sampler│ ──▶ ActuatorPort
//!             └───────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::alerts;
use crate::config::DeviceConfig;
use crate::link::command::{Command, ParseFailure};
use crate::link::framer::LineFramer;
use crate::sensors::{
    BME280_I2C_ADDR_PRIMARY, BME280_I2C_ADDR_SECONDARY, Reading, SensorSampler,
};
use crate::telemetry::{self, SensorFrame, Telemetry};

use super::context::{DeviceContext, LinkStatus};
use super::ports::{ActuatorPort, ClockPort, LinkRx, SensorPort, TelemetrySink};

// ───────────────────────────────────────────────────────────────
// Lifecycle
// ───────────────────────────────────────────────────────────────

/// Device lifecycle state.
///
/// A missing sensor is degraded operation, not a startup failure, so the
/// transition to `Ready` is unconditional. There is no in-process path
/// back: a `reset` command ends the run (the hardware genuinely restarts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Initializing,
    Ready,
}

/// What the main loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Yield the fixed slice and tick again.
    Continue,
    /// A `reset` command was received: end the run so the platform can
    /// restart the node. No further telemetry is emitted.
    Restart,
}

// ───────────────────────────────────────────────────────────────
// DeviceService
// ───────────────────────────────────────────────────────────────

/// The device service orchestrates framing, command dispatch, sampling,
/// alerting, and telemetry.
pub struct DeviceService {
    state: DeviceState,
    ctx: DeviceContext,
    framer: LineFramer,
    sampler: SensorSampler,
    tick_count: u64,
}

impl DeviceService {
    /// Construct the service. Call [`initialize`](Self::initialize) before
    /// the first tick.
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            state: DeviceState::Initializing,
            ctx: DeviceContext::new(config),
            framer: LineFramer::new(),
            sampler: SensorSampler::new(0),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe the hardware, record connectivity, and enter `Ready`.
    ///
    /// Probes the BME280 at its primary then secondary I2C address; either
    /// outcome (including none) transitions to `Ready` — a missing sensor
    /// means synthesized readings, not a boot failure. Emits one `status`
    /// line describing the probe result.
    pub fn initialize(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl TelemetrySink,
        clock: &impl ClockPort,
    ) {
        debug_assert_eq!(self.state, DeviceState::Initializing);

        let bme_address = [BME280_I2C_ADDR_PRIMARY, BME280_I2C_ADDR_SECONDARY]
            .into_iter()
            .find(|&addr| hw.begin(addr));
        let status = LinkStatus {
            bme_connected: bme_address.is_some(),
            bme_address,
            battery_connected: hw.battery_connected(),
        };
        match bme_address {
            Some(addr) => info!("BME280 probe: found at 0x{addr:02x}"),
            None => warn!("BME280 probe: no response, running degraded"),
        }
        self.ctx.status = status;

        hw.set_led(self.ctx.config.led_on);

        // Reseed the degraded-mode generator from the boot clock so two
        // boots don't replay the same synthetic sequence.
        let now = clock.now_ms();
        self.sampler = SensorSampler::new(u64::from(now) ^ 0x5EED);
        self.sampler.mark(now);

        self.emit(sink, &telemetry::probe_status(&self.ctx.status));
        self.state = DeviceState::Ready;
        info!("device ready (sample interval {} ms)", self.ctx.config.sample_interval_ms);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cooperative tick.
    ///
    /// Ordering guarantee: within one tick at most one command frame is
    /// processed and at most one sample/alert/telemetry cycle runs, both
    /// strictly sequenced — a command never straddles a sampling boundary.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut (impl LinkRx + TelemetrySink),
        clock: &impl ClockPort,
    ) -> TickOutcome {
        if self.state != DeviceState::Ready {
            return TickOutcome::Continue;
        }
        self.tick_count += 1;

        // 1. Drain available bytes, stopping at the first complete frame.
        let mut frame = None;
        while let Some(byte) = link.poll_byte() {
            if let Some(f) = self.framer.feed(byte) {
                frame = Some(f);
                break;
            }
        }
        if let Some(frame) = frame {
            let cmd = Command::parse(&frame);
            if self.apply_command(cmd, hw, link, clock) == TickOutcome::Restart {
                return TickOutcome::Restart;
            }
        }

        // 2. Periodic sample, if due.
        let now = clock.now_ms();
        if self.sampler.due(now, &self.ctx.config) {
            self.sampler.mark(now);
            let reading = self.sampler.sample(hw, &self.ctx.status, now);
            self.emit_reading(&reading, link);
            for alert in alerts::evaluate(&reading, &self.ctx.status) {
                self.emit(
                    link,
                    &Telemetry::Alert {
                        message: alert.to_string(),
                    },
                );
            }
            self.ctx.last_reading = Some(reading);
        }

        TickOutcome::Continue
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one parsed command. Effects are synchronous within the tick.
    fn apply_command(
        &mut self,
        cmd: Command,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl TelemetrySink,
        clock: &impl ClockPort,
    ) -> TickOutcome {
        match cmd {
            Command::Led { state: Some(on) } => {
                self.ctx.config.led_on = on;
                hw.set_led(on);
                info!("led command: {}", if on { "on" } else { "off" });
                self.emit(sink, &Telemetry::led_ack(on));
            }
            Command::Led { state: None } => {
                // Protocol quirk kept on purpose: unrecognized LED states
                // are dropped without ack or error.
                debug!("led command with unrecognized state ignored");
            }
            Command::Config {
                sleep_interval_secs: Some(secs),
            } => {
                if self.ctx.config.apply_sleep_interval_secs(secs) {
                    info!("config command: sample interval {} s", secs);
                    self.emit(sink, &Telemetry::config_ack(secs));
                } else {
                    debug!("config command with non-positive interval {} ignored", secs);
                }
            }
            Command::Config {
                sleep_interval_secs: None,
            } => {
                debug!("config command without sleep_interval ignored");
            }
            Command::Reset => {
                // Fire-and-forget by protocol: the host gets no ack before
                // the link goes down.
                info!("reset command received, restarting");
                return TickOutcome::Restart;
            }
            Command::Status => {
                // Out-of-cadence reading; the periodic timer is untouched.
                let now = clock.now_ms();
                let reading = self.sampler.sample(hw, &self.ctx.status, now);
                self.emit_reading(&reading, sink);
                self.ctx.last_reading = Some(reading);
            }
            Command::Unknown { raw, reason } => {
                warn!("unusable command frame: {raw}");
                let message = match reason {
                    ParseFailure::InvalidJson => "Invalid JSON command",
                    ParseFailure::UnknownType => "Unknown command type",
                };
                self.emit(
                    sink,
                    &Telemetry::Error {
                        message: message.to_owned(),
                    },
                );
            }
        }
        TickOutcome::Continue
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Live configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.ctx.config
    }

    /// Boot-time connectivity flags.
    pub fn status(&self) -> &LinkStatus {
        &self.ctx.status
    }

    /// Most recent reading, if any sample has been taken.
    pub fn last_reading(&self) -> Option<&Reading> {
        self.ctx.last_reading.as_ref()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_reading(&self, reading: &Reading, sink: &mut impl TelemetrySink) {
        let frame = SensorFrame::from_reading(reading, &self.ctx);
        self.emit(sink, &Telemetry::Sensor(frame));
    }

    /// Telemetry loss must never stall sampling: log and carry on.
    fn emit(&self, sink: &mut impl TelemetrySink, msg: &Telemetry) {
        if let Err(e) = sink.emit(msg) {
            warn!("telemetry dropped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_starts_in_initializing() {
        let svc = DeviceService::new(DeviceConfig::default());
        assert_eq!(svc.state(), DeviceState::Initializing);
        assert_eq!(svc.tick_count(), 0);
        assert!(svc.last_reading().is_none());
    }
}
