//! Binomial probability mass function for per-spin event counts.
//!
//! A machine that triggers an event with probability `p` on every spin
//! produces `k ~ Binomial(n, p)` events over `n` spins. The mass function is
//! evaluated in log space:
//!
//! `ln P(k | n, p) = ln C(n, k) + k·ln p + (n-k)·ln(1-p)`
//!
//! so that spin counts in the tens of thousands never underflow before the
//! caller gets a chance to normalize.

use super::stable::log_binomial;

/// Log probability of exactly `k` successes in `n` trials.
///
/// # Returns
/// * `NAN` if `p` is NaN or outside `[0, 1]`
/// * `-inf` if `k > n`, or the outcome is impossible at a degenerate `p`
pub fn log_pmf(k: u64, n: u64, p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if k > n {
        return f64::NEG_INFINITY;
    }
    if p == 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    if p == 1.0 {
        return if k == n { 0.0 } else { f64::NEG_INFINITY };
    }

    let successes = k as f64;
    let failures = (n - k) as f64;
    log_binomial(n, k) + successes * p.ln() + failures * (-p).ln_1p()
}

/// Probability of exactly `k` successes in `n` trials.
///
/// Thin `exp` over [`log_pmf`]; returns 0.0 when the mass underflows.
pub fn pmf(k: u64, n: u64, p: f64) -> f64 {
    let lp = log_pmf(k, n, p);
    if lp.is_nan() {
        return f64::NAN;
    }
    lp.exp()
}
