//! Host simulation adapters.
//!
//! Lets the firmware run unmodified on a workstation: the serial link maps
//! to stdin/stdout (one JSON object per line, exactly as on the wire) and
//! the board is simulated. Useful for protocol development against the
//! host application without hardware on the desk.
//!
//! Environment switches:
//!
//! - `ENVNODE_NO_SENSOR=1` — simulate an absent BME280 (degraded mode,
//!   synthesized readings tagged `bme_connected=false`).
//! - `ENVNODE_BATTERY=1` — simulate a battery divider at ~3.9 V.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::app::ports::{ActuatorPort, ClockPort, LinkRx, SensorPort, TelemetrySink};
use crate::error::LinkError;
use crate::sensors::BME280_I2C_ADDR_PRIMARY;
use crate::telemetry::{self, Telemetry};

// ───────────────────────────────────────────────────────────────
// Serial link over stdin/stdout
// ───────────────────────────────────────────────────────────────

/// Stdio-backed serial link.
///
/// std has no non-blocking stdin read, so a detached reader thread plays
/// the role of the UART RX FIFO: it blocks on stdin and forwards bytes
/// into a channel that the tick loop drains with `try_recv`. The
/// cooperative core itself never blocks and stays single-threaded.
pub struct StdioLink {
    rx: Receiver<u8>,
    stdout: std::io::Stdout,
}

impl StdioLink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut locked = stdin.lock();
            loop {
                let buf = match locked.fill_buf() {
                    Ok([]) | Err(_) => break, // EOF or broken pipe
                    Ok(buf) => buf,
                };
                let n = buf.len();
                for &byte in buf {
                    if tx.send(byte).is_err() {
                        return;
                    }
                }
                locked.consume(n);
            }
        });
        Self {
            rx,
            stdout: std::io::stdout(),
        }
    }
}

impl LinkRx for StdioLink {
    fn poll_byte(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(byte) => Some(byte),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl TelemetrySink for StdioLink {
    fn emit(&mut self, msg: &Telemetry) -> Result<(), LinkError> {
        let line = telemetry::to_line(msg)?;
        writeln!(self.stdout, "{line}").map_err(|_| LinkError::Io)?;
        self.stdout.flush().map_err(|_| LinkError::Io)
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated board
// ───────────────────────────────────────────────────────────────

/// Simulated sensors and LED.
///
/// The "hardware" readings drift in a narrow indoor band so they are
/// visually distinct from the wider degraded-mode synthetic ranges.
pub struct SimBoard {
    sensor_present: bool,
    battery_present: bool,
    rng: SmallRng,
    led_on: bool,
}

impl SimBoard {
    /// Build from `ENVNODE_*` environment switches.
    pub fn from_env() -> Self {
        let absent = std::env::var_os("ENVNODE_NO_SENSOR").is_some();
        let battery = std::env::var_os("ENVNODE_BATTERY").is_some();
        Self::new(!absent, battery)
    }

    pub fn new(sensor_present: bool, battery_present: bool) -> Self {
        Self {
            sensor_present,
            battery_present,
            rng: SmallRng::seed_from_u64(0x0B0A_2D5E_ED00),
            led_on: false,
        }
    }

    /// Current simulated LED state (for assertions in examples/tests).
    pub fn led_on(&self) -> bool {
        self.led_on
    }
}

impl SensorPort for SimBoard {
    fn begin(&mut self, address: u8) -> bool {
        // The simulated part is strapped to the primary address.
        self.sensor_present && address == BME280_I2C_ADDR_PRIMARY
    }

    fn read_temperature(&mut self) -> f32 {
        self.rng.random_range(19.0..=24.0)
    }

    fn read_humidity(&mut self) -> f32 {
        self.rng.random_range(40.0..=60.0)
    }

    fn read_pressure(&mut self) -> f32 {
        self.rng.random_range(1000.0..=1020.0)
    }

    fn motion_detected(&mut self) -> bool {
        false
    }

    fn battery_connected(&mut self) -> bool {
        self.battery_present
    }

    fn read_battery_volts(&mut self) -> f32 {
        self.rng.random_range(3.8..=4.0)
    }
}

impl ActuatorPort for SimBoard {
    fn set_led(&mut self, on: bool) {
        self.led_on = on;
        debug!("sim: status LED {}", if on { "on" } else { "off" });
    }
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock backed by `std::time::Instant`.
pub struct HostClock {
    start: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for HostClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wraparound contract: u32 millis roll over
        // every ~49 days, same as on the microcontroller.
        self.start.elapsed().as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_board_answers_primary_address_only() {
        let mut board = SimBoard::new(true, false);
        assert!(board.begin(BME280_I2C_ADDR_PRIMARY));
        assert!(!board.begin(crate::sensors::BME280_I2C_ADDR_SECONDARY));

        let mut absent = SimBoard::new(false, false);
        assert!(!absent.begin(BME280_I2C_ADDR_PRIMARY));
    }

    #[test]
    fn sim_readings_are_plausible() {
        let mut board = SimBoard::new(true, true);
        for _ in 0..100 {
            assert!((19.0..=24.0).contains(&board.read_temperature()));
            assert!((40.0..=60.0).contains(&board.read_humidity()));
            assert!((1000.0..=1020.0).contains(&board.read_pressure()));
            assert!((3.8..=4.0).contains(&board.read_battery_volts()));
        }
    }

    #[test]
    fn led_state_is_recorded() {
        let mut board = SimBoard::new(true, false);
        board.set_led(true);
        assert!(board.led_on());
        board.set_led(false);
        assert!(!board.led_on());
    }
}
