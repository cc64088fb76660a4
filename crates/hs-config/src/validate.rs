//! Spec table validation errors and semantic validation.

use std::collections::HashSet;

use hs_common::Setting;
use serde::Serialize;
use thiserror::Error;

use crate::spec_table::{ModelSpec, SpecTable};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Spec table validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// A table property that is suspicious but does not block analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Validate a spec table semantically.
///
/// Hard failures are returned as `Err`. Intervals that grow with the setting
/// number are only warnings: the table is trusted as published.
pub fn validate_spec_table(table: &SpecTable) -> ValidationResult<Vec<ValidationWarning>> {
    if table.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: table.schema_version.clone(),
        });
    }

    if table.models.is_empty() {
        return Err(ValidationError::MissingField("models".to_string()));
    }

    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for (idx, model) in table.models.iter().enumerate() {
        if model.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("models[{idx}].name"),
                message: "Must not be empty".to_string(),
            });
        }
        if !seen.insert(model.name.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate model name '{}'",
                model.name
            )));
        }
        validate_model(model)?;
        warnings.extend(subunit_warnings(model));
        warnings.extend(monotonic_warnings(model));
    }

    if table.default_model_spec().is_none() {
        return Err(ValidationError::InvalidValue {
            field: "default_model".to_string(),
            message: format!("'{}' is not a declared model", table.default_model),
        });
    }

    Ok(warnings)
}

fn validate_model(model: &ModelSpec) -> ValidationResult<()> {
    for setting in Setting::ALL {
        if !model.settings.contains_key(&setting.get()) {
            return Err(ValidationError::MissingField(format!(
                "{}.settings.{}",
                model.name, setting
            )));
        }
    }
    if let Some(extra) = model
        .settings
        .keys()
        .find(|k| Setting::new(**k).is_none())
    {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.settings.{}", model.name, extra),
            message: "Settings must be 1 through 6".to_string(),
        });
    }

    for (setting, spec) in &model.settings {
        validate_interval(
            &format!("{}.settings.{}.small_interval", model.name, setting),
            spec.small_interval,
        )?;
        validate_interval(
            &format!("{}.settings.{}.big_interval", model.name, setting),
            spec.big_interval,
        )?;
    }
    Ok(())
}

fn validate_interval(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be a positive finite number, got {value}"),
        });
    }
    Ok(())
}

/// Intervals under one spin imply a per-spin rate above 1, which no count
/// can fit: that setting always ends up with zero posterior.
fn subunit_warnings(model: &ModelSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for (setting, spec) in &model.settings {
        for (name, value) in [
            ("small_interval", spec.small_interval),
            ("big_interval", spec.big_interval),
        ] {
            if value < 1.0 {
                warnings.push(ValidationWarning {
                    field: format!("{}.settings.{}.{}", model.name, setting, name),
                    message: format!(
                        "{value} is under one spin; setting {setting} can never be the estimate"
                    ),
                });
            }
        }
    }
    warnings
}

fn monotonic_warnings(model: &ModelSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let ordered: Vec<_> = model.settings.iter().collect();
    for pair in ordered.windows(2) {
        let (lo_key, lo) = pair[0];
        let (hi_key, hi) = pair[1];
        if hi.small_interval > lo.small_interval {
            warnings.push(ValidationWarning {
                field: format!("{}.settings.{}.small_interval", model.name, hi_key),
                message: format!(
                    "{} is longer than setting {} ({})",
                    hi.small_interval, lo_key, lo.small_interval
                ),
            });
        }
        if hi.big_interval > lo.big_interval {
            warnings.push(ValidationWarning {
                field: format!("{}.settings.{}.big_interval", model.name, hi_key),
                message: format!(
                    "{} is longer than setting {} ({})",
                    hi.big_interval, lo_key, lo.big_interval
                ),
            });
        }
    }
    warnings
}
