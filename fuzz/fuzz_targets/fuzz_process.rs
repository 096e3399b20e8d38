#![no_main]

use json_test_data_core::{infer_types, wrap};
use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, feeds valid UTF-8 to both leaf strategies.
// Goal: no panics and no stack exhaustion, even on malformed input.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = wrap(text);
        let _ = infer_types(text);
    }
});
