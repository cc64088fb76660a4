//! Raw row validation.
//!
//! Every row ends in exactly one of three outcomes. Bad data never aborts
//! the batch:
//! - accepted, with a floor placement
//! - accepted but excluded from spatial analyses (non-numeric machine id)
//! - dropped (missing, non-numeric, or zero spin count)

use hs_common::{MachinePlacement, ObservationRecord, RawRecord};
use serde::Serialize;

use crate::logging::{event_names, Stage};

/// Why a row never became an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NonNumericSpins,
    ZeroSpins,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::NonNumericSpins => write!(f, "non-numeric spin count"),
            DropReason::ZeroSpins => write!(f, "zero spins"),
        }
    }
}

/// Outcome for one raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted {
        record: ObservationRecord,
        placement: MachinePlacement,
    },
    SpatiallyExcluded {
        record: ObservationRecord,
    },
    Dropped {
        reason: DropReason,
    },
}

impl RowOutcome {
    pub fn record(&self) -> Option<&ObservationRecord> {
        match self {
            RowOutcome::Accepted { record, .. } | RowOutcome::SpatiallyExcluded { record } => {
                Some(record)
            }
            RowOutcome::Dropped { .. } => None,
        }
    }
}

/// Parse a count cell: ASCII digits only, surrounding whitespace and
/// thousands separators ignored.
pub fn parse_count(cell: &str) -> Option<u64> {
    let digits: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Classify a single raw row.
///
/// Non-numeric win counts are coerced to zero; only the spin count can drop
/// a row.
pub fn normalize_row(raw: &RawRecord) -> RowOutcome {
    let spins = match parse_count(&raw.spins) {
        Some(0) => {
            return RowOutcome::Dropped {
                reason: DropReason::ZeroSpins,
            }
        }
        Some(n) => n,
        None => {
            return RowOutcome::Dropped {
                reason: DropReason::NonNumericSpins,
            }
        }
    };

    let record = ObservationRecord {
        date_label: raw.date_label.trim().to_string(),
        machine_id: raw.machine_id.trim().to_string(),
        model: raw.model.trim().to_string(),
        spins,
        small_wins: parse_count(&raw.small_wins).unwrap_or(0),
        big_wins: parse_count(&raw.big_wins).unwrap_or(0),
    };

    match MachinePlacement::parse(&record.machine_id) {
        Some(placement) => RowOutcome::Accepted { record, placement },
        None => RowOutcome::SpatiallyExcluded { record },
    }
}

/// Result of normalizing a batch of raw rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Accepted observations in input order, spatial or not.
    pub records: Vec<ObservationRecord>,
    pub spatially_excluded: usize,
    pub dropped_non_numeric: usize,
    pub dropped_zero_spins: usize,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped_non_numeric + self.dropped_zero_spins
    }
}

/// Normalize a batch, keeping input order.
pub fn normalize(raws: &[RawRecord]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for raw in raws {
        match normalize_row(raw) {
            RowOutcome::Accepted { record, .. } => batch.records.push(record),
            RowOutcome::SpatiallyExcluded { record } => {
                tracing::debug!(
                    target: event_names::NORMALIZE_ROW_UNPLACED,
                    stage = %Stage::Normalize,
                    machine_id = %record.machine_id,
                    "excluded from spatial analyses"
                );
                batch.spatially_excluded += 1;
                batch.records.push(record);
            }
            RowOutcome::Dropped { reason } => {
                tracing::debug!(
                    target: event_names::NORMALIZE_ROW_DROPPED,
                    stage = %Stage::Normalize,
                    machine_id = %raw.machine_id,
                    spins = %raw.spins,
                    %reason,
                    "row dropped"
                );
                match reason {
                    DropReason::NonNumericSpins => batch.dropped_non_numeric += 1,
                    DropReason::ZeroSpins => batch.dropped_zero_spins += 1,
                }
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, spins: &str, small: &str, big: &str) -> RawRecord {
        RawRecord {
            date_label: "2/7".to_string(),
            machine_id: id.to_string(),
            model: "マイジャグラーV".to_string(),
            spins: spins.to_string(),
            small_wins: small.to_string(),
            big_wins: big.to_string(),
        }
    }

    #[test]
    fn zero_spins_dropped() {
        assert_eq!(
            normalize_row(&raw("1001", "0", "1", "1")),
            RowOutcome::Dropped {
                reason: DropReason::ZeroSpins
            }
        );
    }

    #[test]
    fn non_numeric_spins_dropped() {
        for spins in ["", "-", "12a", "-5", "1.5"] {
            assert_eq!(
                normalize_row(&raw("1001", spins, "1", "1")),
                RowOutcome::Dropped {
                    reason: DropReason::NonNumericSpins
                },
                "{spins:?}"
            );
        }
    }

    #[test]
    fn numeric_id_accepted_with_placement() {
        match normalize_row(&raw("1007", "6,123", "x", "21")) {
            RowOutcome::Accepted { record, placement } => {
                assert_eq!(record.spins, 6123);
                assert_eq!(record.small_wins, 0);
                assert_eq!(record.big_wins, 21);
                assert_eq!(placement.mid, 1007);
                assert_eq!(placement.end_digit, 7);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_numeric_id_kept_but_not_placed() {
        let outcome = normalize_row(&raw("B-12", "3000", "10", "11"));
        assert!(matches!(outcome, RowOutcome::SpatiallyExcluded { .. }));
        assert_eq!(outcome.record().map(|r| r.spins), Some(3000));
    }

    #[test]
    fn batch_counts_each_outcome() {
        let raws = vec![
            raw("1001", "5000", "20", "20"),
            raw("B-12", "3000", "10", "11"),
            raw("1003", "0", "0", "0"),
            raw("1004", "--", "0", "0"),
        ];
        let batch = normalize(&raws);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].machine_id, "1001");
        assert_eq!(batch.records[1].machine_id, "B-12");
        assert_eq!(batch.spatially_excluded, 1);
        assert_eq!(batch.dropped_zero_spins, 1);
        assert_eq!(batch.dropped_non_numeric, 1);
        assert_eq!(batch.dropped(), 2);
    }

    #[test]
    fn empty_input_is_empty_batch() {
        assert!(normalize(&[]).is_empty());
    }
}
