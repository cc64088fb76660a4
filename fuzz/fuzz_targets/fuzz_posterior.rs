//! Fuzz target for the setting estimator.
//!
//! Arbitrary counts under the built-in table: the posterior is either a
//! distribution or, when no setting can explain the counts, all zeros.

#![no_main]

use arbitrary::Arbitrary;
use hs_common::ObservationRecord;
use hs_core::inference::{estimate_one, ProbabilityModel};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    model: String,
    spins: u32,
    small_wins: u32,
    big_wins: u32,
}

fuzz_target!(|input: Input| {
    let Ok(model) = ProbabilityModel::builtin() else {
        return;
    };
    let observation = ObservationRecord {
        date_label: String::new(),
        machine_id: String::new(),
        model: input.model,
        spins: u64::from(input.spins).max(1),
        small_wins: u64::from(input.small_wins),
        big_wins: u64::from(input.big_wins),
    };
    let posterior = estimate_one(&model, &observation);
    let total: f64 = posterior.probabilities.iter().sum();
    assert!(posterior.is_degenerate() || (total - 1.0).abs() < 1e-9);
});
