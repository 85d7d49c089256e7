//! Fuzz target for cpuinfo text scanning.
//!
//! The scanner must accept arbitrary bytes (overlong lines, invalid UTF-8,
//! stray colons) without panicking and must only set bits the registry
//! defines.

#![no_main]

use arbitrary::Arbitrary;
use cf_core::probe::cpuinfo;
use cf_core::scan::StringView;
use cf_core::{Architecture, Registry, Word};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    aarch64: bool,
    text: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let arch = if input.aarch64 {
        Architecture::Aarch64
    } else {
        Architecture::Ppc
    };
    let registry = Registry::for_arch(arch);
    let result = cpuinfo::scan(registry, input.text);

    assert_eq!(result.words[0] & !registry.known_mask(Word::Hwcap), 0);
    assert_eq!(result.words[1] & !registry.known_mask(Word::Hwcap2), 0);

    let _ = StringView::new(input.text).parse_positive_number();
});
