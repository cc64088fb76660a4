//! Observation records and the identity types derived from them.
//!
//! A [`RawRecord`] is what a source hands over: every count still as cell
//! text. The normalizer turns it into an [`ObservationRecord`] (typed, spins
//! > 0) and, separately, a [`MachinePlacement`] when the machine id is
//! numeric. Placement lives in its own type so the base record stays exactly
//! what was observed.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowest setting counted as "high".
pub const HIGH_SETTING_MIN: u8 = 5;

/// Characters stripped from a machine id before numeric parsing.
pub const MACHINE_ID_SEPARATORS: &[char] = &['-'];

/// One row as delivered by a source, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date_label: String,
    pub machine_id: String,
    pub model: String,
    #[serde(deserialize_with = "cell_text")]
    pub spins: String,
    #[serde(deserialize_with = "cell_text")]
    pub small_wins: String,
    #[serde(deserialize_with = "cell_text")]
    pub big_wins: String,
}

/// Accept either a JSON string or a JSON number for a count cell.
fn cell_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A validated, immutable observation of one machine on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub date_label: String,
    pub machine_id: String,
    pub model: String,
    /// Always > 0 once the normalizer has accepted the row.
    pub spins: u64,
    pub small_wins: u64,
    pub big_wins: u64,
}

/// Hidden payout setting, 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Setting(u8);

impl Setting {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Every setting in ascending order.
    pub const ALL: [Setting; 6] = [
        Setting(1),
        Setting(2),
        Setting(3),
        Setting(4),
        Setting(5),
        Setting(6),
    ];

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Setting(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in [`Setting::ALL`].
    pub fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    pub fn is_high(self) -> bool {
        self.0 >= HIGH_SETTING_MIN
    }
}

impl TryFrom<u8> for Setting {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Setting::new(value).ok_or_else(|| format!("setting must be 1..=6, got {value}"))
    }
}

impl From<Setting> for u8 {
    fn from(setting: Setting) -> Self {
        setting.0
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric position of a machine on the hall floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachinePlacement {
    /// Integer value of the separator-stripped id.
    pub mid: u64,
    /// Last digit of the separator-stripped id.
    pub end_digit: u8,
}

impl MachinePlacement {
    /// Derive placement from a machine id such as `"1007"` or `"10-07"`.
    ///
    /// Returns `None` when the stripped id is empty, contains anything but
    /// ASCII digits, or does not fit in a `u64`.
    pub fn parse(machine_id: &str) -> Option<Self> {
        let canonical: String = machine_id
            .trim()
            .chars()
            .filter(|c| !MACHINE_ID_SEPARATORS.contains(c))
            .collect();
        if canonical.is_empty() || !canonical.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mid = canonical.parse::<u64>().ok()?;
        let end_digit = canonical.bytes().last()? - b'0';
        Some(MachinePlacement { mid, end_digit })
    }
}
