//! EnvNode firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within the adapter modules.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod sensors;
pub mod telemetry;

#[cfg(all(target_os = "espidf", feature = "espidf"))]
mod pins;

// Platform adapters: host simulation or real ESP32 peripherals.
pub mod adapters;
