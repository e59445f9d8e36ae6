//! Fuzz target for package URL parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_purl
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(id) = bomaudit_repo::fuzz::parse_purl(text)
    {
        assert!(!id.group.is_empty() && !id.artifact.is_empty());
        let _ = id.relative_dir();
    }
});
