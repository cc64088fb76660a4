//! End-to-end analysis: sources → normalize → estimate → report.

use hs_common::Error;
use serde::Serialize;

use crate::inference::{estimate, EstimatedRecord, ProbabilityModel};
use crate::logging::{event_names, LogContext, Stage};
use crate::normalize::{normalize, NormalizedBatch};
use crate::report::{build_report, AnalysisReport};
use crate::source::{collect_sources, RecordSource, SourceFailure};

/// Row counts from normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    pub accepted: usize,
    pub spatially_excluded: usize,
    pub dropped_non_numeric: usize,
    pub dropped_zero_spins: usize,
}

impl From<&NormalizedBatch> for NormalizationStats {
    fn from(batch: &NormalizedBatch) -> Self {
        NormalizationStats {
            accepted: batch.records.len(),
            spatially_excluded: batch.spatially_excluded,
            dropped_non_numeric: batch.dropped_non_numeric,
            dropped_zero_spins: batch.dropped_zero_spins,
        }
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub source_count: usize,
    pub succeeded_sources: usize,
    pub failures: Vec<SourceFailure>,
    pub normalization: NormalizationStats,
    /// Degenerate posteriors (no setting could explain the counts).
    pub degenerate: usize,
    pub report: AnalysisReport,
    /// Every estimated record, placed or not. Exported, not printed.
    #[serde(skip)]
    pub estimated: Vec<EstimatedRecord>,
}

impl AnalysisOutcome {
    /// Some sources failed but the analysis still ran.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run the analysis over `sources`.
///
/// Failing sources are recorded in the outcome. Fails with
/// [`Error::EmptyBatch`] when no record survives normalization.
pub fn analyze(
    model: &ProbabilityModel,
    sources: &[Box<dyn RecordSource>],
    ctx: &LogContext,
) -> Result<AnalysisOutcome, Error> {
    let batch = collect_sources(sources, ctx);

    let normalized = normalize(&batch.records);
    let normalization = NormalizationStats::from(&normalized);
    crate::log_event!(
        ctx,
        INFO,
        event_names::NORMALIZE_FINISHED,
        Stage::Normalize,
        "normalization finished",
        accepted = normalization.accepted,
        spatially_excluded = normalization.spatially_excluded,
        dropped = normalized.dropped()
    );
    if normalized.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let estimated = estimate(model, &normalized.records);
    let mut degenerate = 0;
    for record in estimated.iter().filter(|r| r.posterior.is_degenerate()) {
        degenerate += 1;
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::ESTIMATE_DEGENERATE,
            Stage::Estimate,
            "no setting explains the counts",
            machine_id = record.observation.machine_id.as_str(),
            date = record.observation.date_label.as_str()
        );
    }
    crate::log_event!(
        ctx,
        INFO,
        event_names::ESTIMATE_FINISHED,
        Stage::Estimate,
        "estimation finished",
        records = estimated.len(),
        degenerate = degenerate
    );

    let report = build_report(&estimated, sources.len());

    Ok(AnalysisOutcome {
        source_count: sources.len(),
        succeeded_sources: batch.succeeded,
        failures: batch.failures,
        normalization,
        degenerate,
        report,
        estimated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use hs_common::RawRecord;

    struct Rows(Vec<RawRecord>);

    impl RecordSource for Rows {
        fn label(&self) -> &str {
            "2/7"
        }
        fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl RecordSource for Broken {
        fn label(&self) -> &str {
            "2/14"
        }
        fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
            Err(SourceError::TableNotFound)
        }
    }

    fn raw(id: &str, spins: &str, small: &str, big: &str) -> RawRecord {
        RawRecord {
            date_label: "2/7".into(),
            machine_id: id.into(),
            model: "アイムジャグラーEX".into(),
            spins: spins.into(),
            small_wins: small.into(),
            big_wins: big.into(),
        }
    }

    fn ctx() -> LogContext {
        LogContext::new("run-test", "host-test")
    }

    #[test]
    fn partial_sources_still_analysed() {
        let model = ProbabilityModel::builtin().unwrap();
        let sources: Vec<Box<dyn RecordSource>> = vec![
            Box::new(Rows(vec![
                raw("1001", "6000", "25", "25"),
                raw("1002", "0", "0", "0"),
                raw("B-12", "3000", "10", "10"),
                raw("1003", "-", "0", "0"),
            ])),
            Box::new(Broken),
        ];
        let outcome = analyze(&model, &sources, &ctx()).unwrap();
        assert!(outcome.is_partial());
        assert_eq!(outcome.source_count, 2);
        assert_eq!(outcome.succeeded_sources, 1);
        assert_eq!(outcome.normalization.accepted, 2);
        assert_eq!(outcome.normalization.spatially_excluded, 1);
        assert_eq!(outcome.normalization.dropped_zero_spins, 1);
        assert_eq!(outcome.normalization.dropped_non_numeric, 1);
        assert_eq!(outcome.estimated.len(), 2);
        assert_eq!(outcome.report.kpis.machine_count, 1);
    }

    #[test]
    fn no_surviving_rows_is_empty_batch() {
        let model = ProbabilityModel::builtin().unwrap();
        let sources: Vec<Box<dyn RecordSource>> =
            vec![Box::new(Rows(vec![raw("1001", "0", "0", "0")])), Box::new(Broken)];
        assert!(matches!(
            analyze(&model, &sources, &ctx()),
            Err(Error::EmptyBatch)
        ));
    }

    #[test]
    fn degenerate_rows_counted() {
        let model = ProbabilityModel::builtin().unwrap();
        let sources: Vec<Box<dyn RecordSource>> =
            vec![Box::new(Rows(vec![raw("1001", "10", "20", "20")]))];
        let outcome = analyze(&model, &sources, &ctx()).unwrap();
        assert_eq!(outcome.degenerate, 1);
        assert!(!outcome.is_partial());
    }
}
