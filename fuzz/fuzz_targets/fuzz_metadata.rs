//! Fuzz target for analyzer metadata (`meta_info.json`) parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_metadata
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = bomaudit_repo::fuzz::parse_metadata(text);
    }
});
