//! Newline-delimited frame accumulator.
//!
//! Feeds one byte at a time, yields a complete frame when the terminator
//! arrives. This handles partial reads gracefully — the serial port may
//! deliver a frame one byte per tick, or several frames back to back.
//!
//! The buffer is a fixed-capacity `heapless::Vec`: a line that exceeds
//! [`MAX_FRAME_LEN`] without a terminator is a framing error. The policy is
//! to silently drop the entire oversized line (everything up to the next
//! newline) and resynchronize, never to crash or allocate further.

use log::warn;

/// Maximum accepted line length in bytes, terminator excluded.
pub const MAX_FRAME_LEN: usize = 1024;

/// Streaming line framer.
pub struct LineFramer {
    buf: heapless::Vec<u8, MAX_FRAME_LEN>,
    /// Set after an overflow: swallow bytes until the next newline.
    discarding: bool,
}

impl LineFramer {
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte into the framer.
    ///
    /// Returns `Some(frame)` when a newline completes a non-empty line; the
    /// frame is trimmed of surrounding whitespace (including `\r` from CRLF
    /// hosts). Oversized and non-UTF-8 lines are dropped silently.
    pub fn feed(&mut self, byte: u8) -> Option<String> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                self.buf.clear();
                return None;
            }
            let frame = match core::str::from_utf8(&self.buf) {
                Ok(s) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_owned())
                    }
                }
                Err(_) => {
                    warn!("framer: non-UTF-8 line dropped ({} bytes)", self.buf.len());
                    None
                }
            };
            self.buf.clear();
            return frame;
        }

        if self.discarding {
            return None;
        }
        if self.buf.push(byte).is_err() {
            warn!("framer: line exceeded {MAX_FRAME_LEN} bytes, dropping");
            self.buf.clear();
            self.discarding = true;
        }
        None
    }

    /// Discard any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(framer: &mut LineFramer, s: &str) -> Vec<String> {
        s.bytes().filter_map(|b| framer.feed(b)).collect()
    }

    #[test]
    fn yields_nothing_until_terminator() {
        let mut f = LineFramer::new();
        assert!(feed_str(&mut f, "{\"type\":\"status\"}").is_empty());
        assert_eq!(feed_str(&mut f, "\n"), ["{\"type\":\"status\"}"]);
    }

    #[test]
    fn trims_surrounding_whitespace_and_cr() {
        let mut f = LineFramer::new();
        assert_eq!(feed_str(&mut f, "  {\"a\":1} \r\n"), ["{\"a\":1}"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut f = LineFramer::new();
        assert!(feed_str(&mut f, "\n\r\n   \n").is_empty());
    }

    #[test]
    fn multiple_frames_in_one_burst() {
        let mut f = LineFramer::new();
        assert_eq!(feed_str(&mut f, "one\ntwo\n"), ["one", "two"]);
    }

    #[test]
    fn oversized_line_dropped_through_terminator() {
        let mut f = LineFramer::new();
        let long = "x".repeat(MAX_FRAME_LEN + 200);
        assert!(feed_str(&mut f, &long).is_empty());
        // The tail of the oversized line must not surface as a frame.
        assert!(feed_str(&mut f, "tail\n").is_empty());
        // And the framer resynchronizes on the following line.
        assert_eq!(feed_str(&mut f, "next\n"), ["next"]);
    }

    #[test]
    fn exactly_max_len_is_accepted() {
        let mut f = LineFramer::new();
        let line = "y".repeat(MAX_FRAME_LEN);
        let mut out = feed_str(&mut f, &line);
        assert!(out.is_empty());
        out.extend(feed_str(&mut f, "\n"));
        assert_eq!(out, [line]);
    }

    #[test]
    fn invalid_utf8_dropped_silently() {
        let mut f = LineFramer::new();
        for b in [0xff, 0xfe] {
            assert!(f.feed(b).is_none());
        }
        assert!(f.feed(b'\n').is_none());
        // Subsequent valid traffic is unaffected.
        assert_eq!(feed_str(&mut f, "ok\n"), ["ok"]);
    }

    #[test]
    fn reset_discards_partial_line() {
        let mut f = LineFramer::new();
        assert!(feed_str(&mut f, "partial").is_empty());
        f.reset();
        assert_eq!(feed_str(&mut f, "fresh\n"), ["fresh"]);
    }
}
