//! Hall analysis report.
//!
//! Built from estimated records whose machine ids are numeric; records with
//! other ids are kept in the export but have no place on the floor.

use hs_common::Setting;
use hs_math::{mean, Summary};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::{aggregate_rows, placement, Field, GroupKey, GroupSummary};
use crate::inference::EstimatedRecord;
use crate::layout::{detect_islands, Island, Position};

/// Machines with a mean high-setting probability above this are "hot".
pub const HOT_MACHINE_THRESHOLD: f64 = 0.4;

/// Reference line drawn across the end-digit chart.
pub const END_DIGIT_REFERENCE: f64 = 0.3;

/// Number of end digits listed as the best.
const TOP_DIGITS: usize = 3;

/// How generous the hall looks, by share of records estimated at 5 or 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBand {
    /// Above 30 %.
    Plenty,
    /// Above 15 %.
    Typical,
    Scarce,
}

impl RatioBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 30.0 {
            RatioBand::Plenty
        } else if percent > 15.0 {
            RatioBand::Typical
        } else {
            RatioBand::Scarce
        }
    }
}

impl std::fmt::Display for RatioBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatioBand::Plenty => write!(f, "plenty"),
            RatioBand::Typical => write!(f, "typical"),
            RatioBand::Scarce => write!(f, "scarce"),
        }
    }
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    /// Records with a floor placement.
    pub machine_count: usize,
    pub source_count: usize,
    pub mean_most_likely_setting: f64,
    /// Percent of placed records whose most likely setting is 5 or 6.
    pub high_setting_ratio: f64,
    pub ratio_band: RatioBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndDigitScore {
    pub end_digit: u8,
    pub mean_high_setting_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineScore {
    pub mid: u64,
    pub mean_high_setting_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub position: Position,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyScore {
    pub date: String,
    pub mean_most_likely_setting: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingCount {
    pub setting: Setting,
    pub count: usize,
}

/// Everything the analysis shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub kpis: Kpis,
    pub end_digits: Vec<GroupSummary>,
    pub end_digit_reference: f64,
    pub top_end_digits: Vec<EndDigitScore>,
    pub machines: Vec<MachineScore>,
    pub hot_machines: Vec<MachineScore>,
    pub islands: Vec<Island>,
    pub positions: Vec<PositionSummary>,
    /// One row per island, one column per position within the island.
    pub heatmap: Vec<Vec<Option<f64>>>,
    pub daily: Vec<DailyScore>,
    pub distribution: Vec<SettingCount>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.kpis.machine_count == 0
    }
}

/// Build the report. `source_count` is the number of manifest entries.
pub fn build_report(estimated: &[EstimatedRecord], source_count: usize) -> AnalysisReport {
    let placed: Vec<EstimatedRecord> = estimated
        .iter()
        .filter(|r| placement(r).is_some())
        .cloned()
        .collect();

    let end_digits = aggregate_rows(&placed, GroupKey::EndDigit, Field::HighSettingProbability);
    let machines = machine_scores(&placed);
    let hot_machines = machines
        .iter()
        .filter(|m| m.mean_high_setting_probability > HOT_MACHINE_THRESHOLD)
        .cloned()
        .collect();

    let mids: Vec<u64> = machines.iter().map(|m| m.mid).collect();
    let islands = detect_islands(&mids);
    let by_mid: BTreeMap<u64, f64> = machines
        .iter()
        .map(|m| (m.mid, m.mean_high_setting_probability))
        .collect();

    AnalysisReport {
        kpis: kpis(&placed, source_count),
        top_end_digits: top_end_digits(&end_digits),
        end_digits,
        end_digit_reference: END_DIGIT_REFERENCE,
        positions: position_summaries(&islands, &by_mid),
        heatmap: heatmap(&islands, &by_mid),
        islands,
        machines,
        hot_machines,
        daily: daily(&placed),
        distribution: distribution(&placed),
    }
}

fn kpis(placed: &[EstimatedRecord], source_count: usize) -> Kpis {
    let settings: Vec<f64> = placed
        .iter()
        .map(|r| Field::MostLikelySetting.value(r))
        .collect();
    let high = placed
        .iter()
        .filter(|r| r.posterior.most_likely_setting.is_high())
        .count();
    let high_setting_ratio = if placed.is_empty() {
        0.0
    } else {
        high as f64 / placed.len() as f64 * 100.0
    };
    Kpis {
        machine_count: placed.len(),
        source_count,
        mean_most_likely_setting: mean(&settings).unwrap_or(0.0),
        high_setting_ratio,
        ratio_band: RatioBand::from_percent(high_setting_ratio),
    }
}

fn top_end_digits(rows: &[GroupSummary]) -> Vec<EndDigitScore> {
    let mut scores: Vec<EndDigitScore> = rows
        .iter()
        .filter_map(|row| match row.key {
            crate::aggregate::GroupValue::EndDigit(d) => Some(EndDigitScore {
                end_digit: d,
                mean_high_setting_probability: row.summary.mean,
            }),
            _ => None,
        })
        .collect();
    // Rows arrive in digit order and the sort is stable, so ties keep the lower digit first.
    scores.sort_by(|a, b| {
        b.mean_high_setting_probability
            .total_cmp(&a.mean_high_setting_probability)
    });
    scores.truncate(TOP_DIGITS);
    scores
}

/// Mean high-setting probability per numeric machine id, ascending by id.
fn machine_scores(placed: &[EstimatedRecord]) -> Vec<MachineScore> {
    let mut by_mid: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for record in placed {
        if let Some(p) = placement(record) {
            by_mid
                .entry(p.mid)
                .or_default()
                .push(record.posterior.high_setting_probability);
        }
    }
    by_mid
        .into_iter()
        .filter_map(|(mid, values)| {
            mean(&values).map(|m| MachineScore {
                mid,
                mean_high_setting_probability: m,
            })
        })
        .collect()
}

fn position_summaries(islands: &[Island], by_mid: &BTreeMap<u64, f64>) -> Vec<PositionSummary> {
    let mut groups: BTreeMap<Position, Vec<f64>> = BTreeMap::new();
    for island in islands {
        for (mid, position) in island.positions() {
            if let Some(score) = by_mid.get(&mid) {
                groups.entry(position).or_default().push(*score);
            }
        }
    }
    groups
        .into_iter()
        .filter_map(|(position, scores)| {
            Summary::of(&scores).map(|summary| PositionSummary { position, summary })
        })
        .collect()
}

fn heatmap(islands: &[Island], by_mid: &BTreeMap<u64, f64>) -> Vec<Vec<Option<f64>>> {
    let width = islands.iter().map(Island::len).max().unwrap_or(0);
    islands
        .iter()
        .map(|island| {
            let mut row = vec![None; width];
            for (slot, mid) in row.iter_mut().zip(island.members()) {
                *slot = by_mid.get(mid).copied();
            }
            row
        })
        .collect()
}

fn daily(placed: &[EstimatedRecord]) -> Vec<DailyScore> {
    aggregate_rows(placed, GroupKey::Date, Field::MostLikelySetting)
        .into_iter()
        .map(|row| DailyScore {
            date: row.key.to_string(),
            mean_most_likely_setting: row.summary.mean,
        })
        .collect()
}

fn distribution(placed: &[EstimatedRecord]) -> Vec<SettingCount> {
    Setting::ALL
        .iter()
        .map(|setting| SettingCount {
            setting: *setting,
            count: placed
                .iter()
                .filter(|r| r.posterior.most_likely_setting == *setting)
                .count(),
        })
        .collect()
}
