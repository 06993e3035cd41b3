//! Unified error types for the EnvNode firmware.
//!
//! Follows embedded practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level tick loop's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed around
//! without allocation.
//!
//! Note that most of the protocol-level failure modes (oversized frames,
//! malformed JSON, unknown command types) never appear here: they are
//! handled locally — a silent buffer reset or an `error` telemetry line —
//! and the tick loop continues unconditionally. Only transport and
//! initialization failures are worth propagating.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link failed to carry a telemetry line.
    Link(LinkError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Serial link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// A telemetry value could not be serialized to JSON.
    Serialize,
    /// The underlying byte transport rejected the write.
    Io,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize => write!(f, "JSON serialization failed"),
            Self::Io => write!(f, "serial write failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
