//! Per-spin event probabilities for a (model, setting) pair.
//!
//! The spec table publishes "average spins per occurrence". Under a
//! Bernoulli-per-spin reading, the per-spin probability is its reciprocal.
//! Resolution never fails: an unknown model falls back to the table's
//! default model and a missing setting falls back to setting 1.

use hs_common::Setting;
use hs_config::{validate_spec_table, ModelSpec, SpecTable, ValidationError};
use serde::{Deserialize, Serialize};

/// Per-spin occurrence probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventProbabilities {
    pub p_small: f64,
    pub p_big: f64,
}

/// Probabilities for all six settings of one model family.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRates {
    pub name: String,
    rates: [EventProbabilities; 6],
}

impl ModelRates {
    fn from_spec(spec: &ModelSpec) -> Self {
        let rates = Setting::ALL.map(|setting| match spec.setting_or_base(setting) {
            Some(s) => EventProbabilities {
                p_small: 1.0 / s.small_interval,
                p_big: 1.0 / s.big_interval,
            },
            // Unreachable for a validated table.
            None => EventProbabilities {
                p_small: f64::NAN,
                p_big: f64::NAN,
            },
        });
        ModelRates {
            name: spec.name.clone(),
            rates,
        }
    }

    pub fn for_setting(&self, setting: Setting) -> EventProbabilities {
        self.rates[setting.index()]
    }
}

/// Probability model over an injected, immutable spec table.
#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    /// Declaration order is the match order.
    models: Vec<ModelRates>,
    default_index: usize,
}

impl ProbabilityModel {
    /// Build from a spec table. The table is validated first so every later
    /// lookup has a default model to fall back on.
    pub fn new(table: &SpecTable) -> Result<Self, ValidationError> {
        validate_spec_table(table)?;
        let default_index = table
            .models
            .iter()
            .position(|m| m.name == table.default_model)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "default_model".to_string(),
                message: format!("'{}' is not a declared model", table.default_model),
            })?;
        Ok(ProbabilityModel {
            models: table.models.iter().map(ModelRates::from_spec).collect(),
            default_index,
        })
    }

    /// The built-in table.
    pub fn builtin() -> Result<Self, ValidationError> {
        Self::new(&SpecTable::default())
    }

    /// First model whose fragment is contained in `model_name`, else the default.
    pub fn resolve(&self, model_name: &str) -> &ModelRates {
        self.models
            .iter()
            .find(|m| model_name.contains(m.name.as_str()))
            .unwrap_or(&self.models[self.default_index])
    }

    /// Whether `model_name` matched a fragment (false means the default was used).
    pub fn is_known(&self, model_name: &str) -> bool {
        self.models
            .iter()
            .any(|m| model_name.contains(m.name.as_str()))
    }

    pub fn probabilities_for(&self, model_name: &str, setting: Setting) -> EventProbabilities {
        self.resolve(model_name).for_setting(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_config::builtin::DEFAULT_MODEL;

    fn setting(n: u8) -> Setting {
        Setting::new(n).unwrap()
    }

    #[test]
    fn reciprocal_of_intervals() {
        let model = ProbabilityModel::builtin().unwrap();
        let p = model.probabilities_for("アイムジャグラーEX", setting(6));
        assert!((p.p_big - 1.0 / 255.0).abs() < 1e-15);
        assert!((p.p_small - 1.0 / 255.0).abs() < 1e-15);
    }

    #[test]
    fn unknown_model_uses_default() {
        let model = ProbabilityModel::builtin().unwrap();
        assert!(!model.is_known("スーパーハナハナ"));
        assert_eq!(model.resolve("スーパーハナハナ").name, DEFAULT_MODEL);
        assert_eq!(
            model.probabilities_for("スーパーハナハナ", setting(3)),
            model.probabilities_for(DEFAULT_MODEL, setting(3))
        );
    }

    #[test]
    fn first_declared_fragment_wins() {
        let model = ProbabilityModel::builtin().unwrap();
        // Contains both the Im and My fragments; Im is declared first.
        assert_eq!(
            model.resolve("アイムジャグラー/マイジャグラー").name,
            "アイムジャグラー"
        );
    }

    #[test]
    fn shorter_interval_gives_larger_probability() {
        let model = ProbabilityModel::builtin().unwrap();
        let low = model.probabilities_for("マイジャグラーV", setting(1));
        let high = model.probabilities_for("マイジャグラーV", setting(6));
        assert!(high.p_big > low.p_big);
        assert!(high.p_small > low.p_small);
    }

    #[test]
    fn invalid_table_rejected_at_construction() {
        let mut table = SpecTable::default();
        table.default_model = "nope".to_string();
        assert!(ProbabilityModel::new(&table).is_err());
    }
}
