//! Fuzz target: `Command::parse`
//!
//! Parsing is total: any UTF-8 input must map to exactly one command
//! without panicking, and the failure modes must land in `Unknown`.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use envnode::link::command::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: &str| {
    let _ = Command::parse(frame);
});
