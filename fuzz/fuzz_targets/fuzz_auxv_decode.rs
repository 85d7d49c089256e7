//! Fuzz target for auxiliary-vector decoding.
//!
//! Tests that `parse_auxv` handles truncated and garbage entries without
//! panicking.

#![no_main]

use cf_core::probe::parse_auxv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = parse_auxv(data);
});
