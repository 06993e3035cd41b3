//! Platform adapters behind the port traits.
//!
//! - [`host`] — stdin/stdout serial emulation plus a simulated board, for
//!   development and integration testing on a workstation.
//! - [`esp`] — real ESP32 peripherals (UART0 link, I2C BME280, ADC battery
//!   divider, PIR input, status LED). Compiled only for ESP-IDF targets
//!   with the `espidf` feature.

#[cfg(not(target_os = "espidf"))]
pub mod host;

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub mod esp;
