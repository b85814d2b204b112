//! Fuzz target for single-line label decoding.
//!
//! Feeds arbitrary UTF-8 lines to the decoder of both label schemas,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use regionlab::label::fuzz_decode_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_decode_line(line);
});
