//! Setting inference: probability model and posterior estimation.

pub mod posterior;
pub mod probability;

pub use posterior::{estimate, estimate_one, log_likelihoods, EstimatedRecord, PosteriorEstimate};
pub use probability::{EventProbabilities, ModelRates, ProbabilityModel};
