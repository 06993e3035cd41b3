//! Inbound command parsing.
//!
//! One frame is one JSON object with a `"type"` field. Parsing is total:
//! any input string maps to exactly one [`Command`], with the failure modes
//! folded into [`Command::Unknown`] so the device service can report them
//! over the link without special-casing.
//!
//! Two deliberately permissive behaviors of the wire protocol are preserved
//! here rather than "fixed":
//!
//! - an `led` command whose `state` is neither `"on"` nor `"off"` is a
//!   silent no-op (no ack, no error);
//! - a `config` command without a usable `sleep_interval` is likewise a
//!   silent no-op.

use serde_json::Value;

/// Why a frame could not be mapped to a known command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// The frame was not a JSON object at all.
    InvalidJson,
    /// Valid JSON, but the `type` field is missing or unrecognized.
    UnknownType,
}

/// A parsed host command, consumed within the tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `{"type":"led","state":"on"|"off"}`. `None` means the state value
    /// was missing or unrecognized — ignored by policy.
    Led { state: Option<bool> },
    /// `{"type":"config","sleep_interval":<seconds>}`. `None` means the
    /// key was absent or not an integer — a no-op.
    Config { sleep_interval_secs: Option<i64> },
    /// `{"type":"reset"}` — unconditional restart, no ack beforehand.
    Reset,
    /// `{"type":"status"}` — immediate out-of-cadence sensor emission.
    Status,
    /// Anything else; `reason` selects the error message on the wire.
    Unknown { raw: String, reason: ParseFailure },
}

impl Command {
    /// Parse one frame. Never fails — see [`Command::Unknown`].
    pub fn parse(frame: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(frame) else {
            return Self::unknown(frame, ParseFailure::InvalidJson);
        };
        let Some(obj) = value.as_object() else {
            return Self::unknown(frame, ParseFailure::InvalidJson);
        };
        let Some(kind) = obj.get("type").and_then(Value::as_str) else {
            return Self::unknown(frame, ParseFailure::UnknownType);
        };

        match kind {
            "led" => Self::Led {
                state: obj.get("state").and_then(Value::as_str).and_then(|s| match s {
                    "on" => Some(true),
                    "off" => Some(false),
                    _ => None,
                }),
            },
            "config" => Self::Config {
                sleep_interval_secs: obj.get("sleep_interval").and_then(Value::as_i64),
            },
            "reset" => Self::Reset,
            "status" => Self::Status,
            _ => Self::unknown(frame, ParseFailure::UnknownType),
        }
    }

    fn unknown(frame: &str, reason: ParseFailure) -> Self {
        Self::Unknown {
            raw: frame.to_owned(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_on_and_off() {
        assert_eq!(
            Command::parse(r#"{"type":"led","state":"on"}"#),
            Command::Led { state: Some(true) }
        );
        assert_eq!(
            Command::parse(r#"{"type":"led","state":"off"}"#),
            Command::Led { state: Some(false) }
        );
    }

    #[test]
    fn led_unrecognized_state_is_preserved_as_noop() {
        assert_eq!(
            Command::parse(r#"{"type":"led","state":"blue"}"#),
            Command::Led { state: None }
        );
        assert_eq!(
            Command::parse(r#"{"type":"led"}"#),
            Command::Led { state: None }
        );
    }

    #[test]
    fn config_carries_seconds_through() {
        assert_eq!(
            Command::parse(r#"{"type":"config","sleep_interval":10}"#),
            Command::Config {
                sleep_interval_secs: Some(10)
            }
        );
        // Absent or non-integer values fall through to a no-op.
        assert_eq!(
            Command::parse(r#"{"type":"config"}"#),
            Command::Config {
                sleep_interval_secs: None
            }
        );
        assert_eq!(
            Command::parse(r#"{"type":"config","sleep_interval":"fast"}"#),
            Command::Config {
                sleep_interval_secs: None
            }
        );
    }

    #[test]
    fn reset_and_status() {
        assert_eq!(Command::parse(r#"{"type":"reset"}"#), Command::Reset);
        assert_eq!(Command::parse(r#"{"type":"status"}"#), Command::Status);
    }

    #[test]
    fn truncated_json_is_invalid() {
        let cmd = Command::parse(r#"{"type": "led""#);
        assert_eq!(
            cmd,
            Command::Unknown {
                raw: r#"{"type": "led""#.to_owned(),
                reason: ParseFailure::InvalidJson,
            }
        );
    }

    #[test]
    fn non_object_json_is_invalid() {
        for frame in ["42", "\"led\"", "[1,2]", "null"] {
            assert!(matches!(
                Command::parse(frame),
                Command::Unknown {
                    reason: ParseFailure::InvalidJson,
                    ..
                }
            ));
        }
    }

    #[test]
    fn missing_or_unknown_type_field() {
        assert!(matches!(
            Command::parse(r#"{"state":"on"}"#),
            Command::Unknown {
                reason: ParseFailure::UnknownType,
                ..
            }
        ));
        assert!(matches!(
            Command::parse(r#"{"type":"selfdestruct"}"#),
            Command::Unknown {
                reason: ParseFailure::UnknownType,
                ..
            }
        ));
        // A non-string `type` is equally unknown.
        assert!(matches!(
            Command::parse(r#"{"type":7}"#),
            Command::Unknown {
                reason: ParseFailure::UnknownType,
                ..
            }
        ));
    }
}
