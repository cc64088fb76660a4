//! Property-based tests for hs-math numerical functions.

use hs_math::binomial::{log_pmf, pmf};
use hs_math::{exp_normalize, log_binomial, log_sum_exp, median, Summary};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn log_sum_exp_commutative(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        prop_assert!(approx_eq(log_sum_exp(&[a, b]), log_sum_exp(&[b, a]), TOL));
    }

    #[test]
    fn log_sum_exp_at_least_max(values in prop::collection::vec(-700.0..700.0f64, 1..12)) {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(log_sum_exp(&values) >= max - TOL);
    }

    #[test]
    fn exp_normalize_is_a_distribution(values in prop::collection::vec(-5000.0..0.0f64, 1..8)) {
        let probs = exp_normalize(&values);
        let sum: f64 = probs.iter().sum();
        prop_assert!(approx_eq(sum, 1.0, 1e-12), "sum = {}", sum);
        prop_assert!(probs.iter().all(|p| (0.0..=1.0 + 1e-12).contains(p)));
    }

    #[test]
    fn log_binomial_symmetric(n in 0u64..5000, k_frac in 0.0..=1.0f64) {
        let k = ((n as f64) * k_frac).floor() as u64;
        prop_assert!(approx_eq(log_binomial(n, k), log_binomial(n, n - k), 1e-8));
    }

    /// Log-space evaluation agrees with the direct product where the latter is representable.
    #[test]
    fn log_pmf_agrees_with_direct_product(n in 1u64..60, k_frac in 0.0..=1.0f64, p in 0.01..0.99f64) {
        let k = ((n as f64) * k_frac).floor() as u64;
        let coef = log_binomial(n, k).exp();
        let direct = coef * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32);
        prop_assert!(approx_eq(pmf(k, n, p), direct, 1e-9), "pmf={} direct={}", pmf(k, n, p), direct);
    }

    #[test]
    fn log_pmf_never_positive(n in 0u64..100_000, k in 0u64..500, p in 0.0..=1.0f64) {
        let lp = log_pmf(k, n, p);
        prop_assert!(!lp.is_nan());
        prop_assert!(lp <= 1e-9, "log pmf {} > 0", lp);
    }

    #[test]
    fn summary_bounds(values in prop::collection::vec(0.0..1.0f64, 1..50)) {
        let s = Summary::of(&values).expect("non-empty");
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(s.count, values.len());
        prop_assert!(s.mean >= lo - TOL && s.mean <= hi + TOL);
        prop_assert!(s.median >= lo - TOL && s.median <= hi + TOL);
        prop_assert_eq!(s.std_dev.is_some(), values.len() >= 2);
        prop_assert_eq!(median(&values), Some(s.median));
    }
}
