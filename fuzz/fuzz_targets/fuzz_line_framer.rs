//! Fuzz target: `LineFramer::feed`
//!
//! Drives arbitrary byte sequences into the line framer and asserts that
//! it never panics, never yields an oversized or untrimmed frame, and
//! resynchronizes cleanly after a reset.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use envnode::link::framer::{LineFramer, MAX_FRAME_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new();

    for &byte in data {
        if let Some(frame) = framer.feed(byte) {
            assert!(frame.len() <= MAX_FRAME_LEN, "frame exceeds MAX_FRAME_LEN");
            assert!(!frame.is_empty(), "framer must not yield empty frames");
            assert_eq!(frame.trim(), frame, "frames are whitespace-trimmed");
        }
    }

    // After a reset the framer must accept bytes cleanly again.
    framer.reset();
    for &byte in data {
        let _ = framer.feed(byte);
    }
});
