//! Log-domain primitives used by the likelihood evaluation.
//!
//! Everything here works on natural logarithms. Probabilities that would
//! underflow an `f64` in linear space (a binomial mass over tens of thousands
//! of spins is routinely below `1e-300`) stay representable as large negative
//! logs until the final normalization step.

use std::f64::consts::PI;

const HALF_LN_2PI: f64 = 0.918_938_533_204_672_8;
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // published Lanczos coefficients (g = 7, n = 9)
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Stable `ln(sum(exp(values)))`.
///
/// Returns `NEG_INFINITY` for an empty slice or when every entry is `-inf`,
/// and `NAN` if any entry is `NAN`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || max == f64::INFINITY {
        return max;
    }
    let shifted: f64 = values.iter().map(|v| (v - max).exp()).sum();
    max + shifted.ln()
}

/// Normalize a vector of log weights into log probabilities.
///
/// If the weights carry no mass at all (every entry `-inf`), the result is a
/// vector of `-inf`: callers exponentiate that into an all-zero distribution.
pub fn normalize_log_probs(log_weights: &[f64]) -> Vec<f64> {
    let total = log_sum_exp(log_weights);
    if !total.is_finite() {
        return vec![f64::NEG_INFINITY; log_weights.len()];
    }
    log_weights.iter().map(|w| w - total).collect()
}

/// Turn log weights into linear probabilities that sum to one.
///
/// NaN weights are treated as carrying no mass. When nothing carries mass the
/// returned vector is all zeros rather than NaN.
pub fn exp_normalize(log_weights: &[f64]) -> Vec<f64> {
    let cleaned: Vec<f64> = log_weights
        .iter()
        .map(|w| if w.is_nan() { f64::NEG_INFINITY } else { *w })
        .collect();
    normalize_log_probs(&cleaned)
        .into_iter()
        .map(|lp| if lp == f64::NEG_INFINITY { 0.0 } else { lp.exp() })
        .collect()
}

/// Natural log of the Gamma function, `ln |Γ(z)|`.
///
/// Lanczos approximation, with the reflection formula for `z < 0.5`.
/// Non-positive integers (poles) yield `NAN`.
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && (z - z.round()).abs() < 1e-15 {
        return f64::NAN;
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let zm1 = z - 1.0;
    let series = LANCZOS_COEFFS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFS[0], |acc, (i, c)| acc + c / (zm1 + i as f64));
    let t = zm1 + LANCZOS_G + 0.5;
    HALF_LN_2PI + (zm1 + 0.5) * t.ln() - t + series.ln()
}

/// `ln(n!)`.
pub fn log_factorial(n: u64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    log_gamma(n as f64 + 1.0)
}

/// `ln(n choose k)`; `-inf` when `k > n`.
pub fn log_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    log_factorial(n) - log_factorial(k) - log_factorial(n - k)
}
