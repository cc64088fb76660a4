//! Grouped summaries of estimated records.
//!
//! `aggregate` partitions records by a key and reduces one numeric field to
//! mean / median / sample std / count. Groups with no records never appear,
//! and an empty input gives an empty map.

use hs_common::MachinePlacement;
use hs_math::Summary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::inference::EstimatedRecord;
use crate::layout::{classify, detect_islands, Position};

/// What to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// Last digit of the numeric machine id (spatial records only).
    EndDigit,
    /// Machine id as observed.
    MachineId,
    Date,
    /// Corner vs center within detected islands (spatial records only).
    IslandType,
}

/// Which value to summarise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    HighSettingProbability,
    MostLikelySetting,
}

impl Field {
    pub fn value(self, record: &EstimatedRecord) -> f64 {
        match self {
            Field::HighSettingProbability => record.posterior.high_setting_probability,
            Field::MostLikelySetting => f64::from(record.posterior.most_likely_setting.get()),
        }
    }
}

/// One group's key value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    EndDigit(u8),
    MachineId(String),
    Date(String),
    IslandType(Position),
}

impl std::fmt::Display for GroupValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupValue::EndDigit(d) => write!(f, "{d}"),
            GroupValue::MachineId(id) | GroupValue::Date(id) => write!(f, "{id}"),
            GroupValue::IslandType(p) => write!(f, "{p}"),
        }
    }
}

/// A flattened group row for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: GroupValue,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Group `records` by `key` and summarise `field`.
pub fn aggregate(
    records: &[EstimatedRecord],
    key: GroupKey,
    field: Field,
) -> BTreeMap<GroupValue, Summary> {
    let mut groups: BTreeMap<GroupValue, Vec<f64>> = BTreeMap::new();

    let positions = match key {
        GroupKey::IslandType => {
            let mids: Vec<u64> = records
                .iter()
                .filter_map(|r| placement(r).map(|p| p.mid))
                .collect();
            classify(&detect_islands(&mids))
        }
        _ => BTreeMap::new(),
    };

    for record in records {
        let group = match key {
            GroupKey::EndDigit => placement(record).map(|p| GroupValue::EndDigit(p.end_digit)),
            GroupKey::MachineId => Some(GroupValue::MachineId(
                record.observation.machine_id.clone(),
            )),
            GroupKey::Date => Some(GroupValue::Date(record.observation.date_label.clone())),
            GroupKey::IslandType => placement(record)
                .and_then(|p| positions.get(&p.mid))
                .map(|pos| GroupValue::IslandType(*pos)),
        };
        if let Some(group) = group {
            groups.entry(group).or_default().push(field.value(record));
        }
    }

    groups
        .into_iter()
        .filter_map(|(k, values)| Summary::of(&values).map(|s| (k, s)))
        .collect()
}

/// `aggregate` as an ordered list of rows.
pub fn aggregate_rows(records: &[EstimatedRecord], key: GroupKey, field: Field) -> Vec<GroupSummary> {
    aggregate(records, key, field)
        .into_iter()
        .map(|(key, summary)| GroupSummary { key, summary })
        .collect()
}

/// Floor placement of a record, if its machine id is numeric.
pub fn placement(record: &EstimatedRecord) -> Option<MachinePlacement> {
    MachinePlacement::parse(&record.observation.machine_id)
}
