//! Criterion benchmarks for batch estimation and the hall report.
//!
//! A synthetic hall of consecutive machine numbers over several days, the
//! shape a multi-week manifest produces.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hs_common::ObservationRecord;
use hs_core::inference::{estimate, ProbabilityModel};
use hs_core::report::build_report;

const MODELS: [&str; 3] = ["マイジャグラーV", "アイムジャグラーEX", "ファンキージャグラー2"];

fn synthetic_hall(machines: usize, days: usize) -> Vec<ObservationRecord> {
    let mut records = Vec::with_capacity(machines * days);
    for day in 0..days {
        for m in 0..machines {
            let spins = 2_000 + ((m * 37 + day * 101) % 6_000) as u64;
            records.push(ObservationRecord {
                date_label: format!("2/{}", day + 1),
                machine_id: (1_000 + m + m / 12 * 10).to_string(),
                model: MODELS[m % MODELS.len()].to_string(),
                spins,
                small_wins: spins / (250 + (m % 9) as u64 * 20),
                big_wins: spins / (240 + (m % 7) as u64 * 15),
            });
        }
    }
    records
}

fn bench_estimate(c: &mut Criterion) {
    let model = match ProbabilityModel::builtin() {
        Ok(model) => model,
        Err(err) => panic!("builtin table invalid: {err}"),
    };

    let mut group = c.benchmark_group("estimate");
    for (machines, days) in [(60, 1), (240, 7), (600, 28)] {
        let records = synthetic_hall(machines, days);
        group.bench_with_input(
            BenchmarkId::new("batch", records.len()),
            &records,
            |b, records| b.iter(|| estimate(black_box(&model), black_box(records))),
        );
    }
    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let model = match ProbabilityModel::builtin() {
        Ok(model) => model,
        Err(err) => panic!("builtin table invalid: {err}"),
    };
    let estimated = estimate(&model, &synthetic_hall(600, 28));

    c.bench_function("report/600x28", |b| {
        b.iter(|| build_report(black_box(&estimated), 28))
    });
}

criterion_group!(benches, bench_estimate, bench_report);
criterion_main!(benches);
