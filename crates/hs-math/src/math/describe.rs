//! Descriptive statistics over grouped values.
//!
//! These back the aggregate tables (mean / median / standard deviation /
//! count per group). Empty input is well defined: no value rather than NaN.

use serde::{Deserialize, Serialize};

/// Reduction of one group of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator); `None` for a single value.
    pub std_dev: Option<f64>,
    pub count: usize,
}

impl Summary {
    /// Summarize a group. Returns `None` for an empty group.
    ///
    /// NaN values are ignored; a group made only of NaN is treated as empty.
    pub fn of(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        Some(Summary {
            mean: mean(&finite)?,
            median: median(&finite)?,
            std_dev: sample_std_dev(&finite),
            count: finite.len(),
        })
    }
}

/// Arithmetic mean; `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (mean of the two middle values for even lengths); `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation with Bessel's correction; `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
