//! Fuzz target for source manifest parsing.
//!
//! Tests that `parse_manifest` and location classification handle arbitrary
//! text without panicking.

#![no_main]

use hs_core::source::{classify_location, model_from_location, parse_manifest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for target in parse_manifest(data) {
        assert!(!target.location.is_empty());
        let _ = model_from_location(&target.location);
        let _ = classify_location(&target.location);
    }
});
