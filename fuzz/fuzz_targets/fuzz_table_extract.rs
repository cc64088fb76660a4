//! Fuzz target for data-table extraction and normalization.
//!
//! Arbitrary bytes are read as a headerless CSV table, run through
//! `extract_records`, and the surviving rows through `normalize`.

#![no_main]

use hs_core::normalize::normalize;
use hs_core::source::extract_records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);
    let table: Vec<Vec<String>> = reader
        .records()
        .filter_map(Result::ok)
        .map(|r| r.iter().map(str::to_string).collect())
        .collect();

    if let Ok(raws) = extract_records("fuzz", "マイジャグラーV", &table) {
        let batch = normalize(&raws);
        // Every accepted record has at least one spin.
        assert!(batch.records.iter().all(|r| r.spins > 0));
        assert_eq!(batch.records.len() + batch.dropped(), raws.len());
    }
});
