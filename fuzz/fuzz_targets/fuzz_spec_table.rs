//! Fuzz target for spec_table.json parsing and validation.
//!
//! Any table that passes validation must also build a probability model.

#![no_main]

use hs_config::{validate_spec_table, SpecTable};
use hs_core::inference::ProbabilityModel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = SpecTable::from_json(text) else {
        return;
    };
    if validate_spec_table(&table).is_ok() {
        assert!(ProbabilityModel::new(&table).is_ok());
    }
});
