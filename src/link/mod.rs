//! Serial link protocol: newline-delimited JSON in both directions.
//!
//! [`framer`] turns the raw inbound byte stream into complete text frames;
//! [`command`] parses a frame into a typed [`Command`](command::Command).
//! Outbound traffic is handled by [`crate::telemetry`].

pub mod command;
pub mod framer;
