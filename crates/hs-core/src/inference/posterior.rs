//! Posterior over the six settings for one observation.
//!
//! Uniform prior, and a likelihood that treats big-win and small-win counts
//! as independent binomial draws over the same spins:
//!
//! `L(s) = Bin(big | spins, p_big(s)) · Bin(small | spins, p_small(s))`
//!
//! Evaluated in log space and normalized by subtracting the maximum, so the
//! posterior is exact for any finite likelihood. Only when every setting is
//! impossible (for example more wins than spins) is the all-zero vector
//! returned.

use hs_common::{ObservationRecord, Setting};
use hs_math::binomial::log_pmf;
use hs_math::exp_normalize;
use serde::{Deserialize, Serialize};

use super::probability::{ModelRates, ProbabilityModel};

/// Posterior attached to one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorEstimate {
    /// P(setting = s | observation) for s = 1..=6.
    pub probabilities: [f64; 6],
    /// P(5) + P(6).
    pub high_setting_probability: f64,
    /// Lowest setting attaining the maximum posterior.
    pub most_likely_setting: Setting,
}

impl PosteriorEstimate {
    pub fn probability(&self, setting: Setting) -> f64 {
        self.probabilities[setting.index()]
    }

    /// True when no setting could explain the observation.
    pub fn is_degenerate(&self) -> bool {
        self.probabilities.iter().all(|p| *p == 0.0)
    }

    fn from_probabilities(probabilities: [f64; 6]) -> Self {
        let high_setting_probability = Setting::ALL
            .iter()
            .filter(|s| s.is_high())
            .map(|s| probabilities[s.index()])
            .sum();

        // Strict `>` keeps the first (lowest) index on ties.
        let mut best = Setting::ALL[0];
        for setting in Setting::ALL.iter().skip(1) {
            if probabilities[setting.index()] > probabilities[best.index()] {
                best = *setting;
            }
        }

        PosteriorEstimate {
            probabilities,
            high_setting_probability,
            most_likely_setting: best,
        }
    }
}

/// An observation with its posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedRecord {
    #[serde(flatten)]
    pub observation: ObservationRecord,
    #[serde(flatten)]
    pub posterior: PosteriorEstimate,
}

/// Log-likelihood of the observation under each setting of `rates`.
pub fn log_likelihoods(rates: &ModelRates, observation: &ObservationRecord) -> [f64; 6] {
    Setting::ALL.map(|setting| {
        let p = rates.for_setting(setting);
        log_pmf(observation.big_wins, observation.spins, p.p_big)
            + log_pmf(observation.small_wins, observation.spins, p.p_small)
    })
}

/// Posterior for a single observation.
pub fn estimate_one(model: &ProbabilityModel, observation: &ObservationRecord) -> PosteriorEstimate {
    let rates = model.resolve(&observation.model);
    let log_lik = log_likelihoods(rates, observation);
    let normalized = exp_normalize(&log_lik);

    let mut probabilities = [0.0; 6];
    for (slot, p) in probabilities.iter_mut().zip(normalized) {
        *slot = p;
    }
    PosteriorEstimate::from_probabilities(probabilities)
}

/// Annotate every observation with its posterior, preserving order.
pub fn estimate(model: &ProbabilityModel, records: &[ObservationRecord]) -> Vec<EstimatedRecord> {
    records
        .iter()
        .map(|observation| EstimatedRecord {
            observation: observation.clone(),
            posterior: estimate_one(model, observation),
        })
        .collect()
}
