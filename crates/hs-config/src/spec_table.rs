//! Spec table types.
//!
//! A spec table maps a machine model to six settings, each described by the
//! published average number of spins between two kinds of bonus events.
//! Models are kept in declaration order: name resolution is a linear
//! containment scan and the first declared fragment that matches wins.

use hs_common::Setting;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Average spins per occurrence for one setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingSpec {
    /// Spins per small-win event (the RB column on hall data sites).
    pub small_interval: f64,
    /// Spins per big-win event (the BB column on hall data sites).
    pub big_interval: f64,
}

impl SettingSpec {
    pub const fn new(small_interval: f64, big_interval: f64) -> Self {
        SettingSpec {
            small_interval,
            big_interval,
        }
    }
}

/// One machine family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Name fragment matched by containment against observed model names.
    pub name: String,
    /// Keyed by setting number 1..=6.
    pub settings: BTreeMap<u8, SettingSpec>,
}

impl ModelSpec {
    /// Intervals for `setting`, falling back to setting 1 when absent.
    pub fn setting_or_base(&self, setting: Setting) -> Option<&SettingSpec> {
        self.settings
            .get(&setting.get())
            .or_else(|| self.settings.get(&Setting::MIN))
    }
}

/// Complete spec table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecTable {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Model used when no fragment matches.
    pub default_model: String,

    /// Declaration order is the match order.
    pub models: Vec<ModelSpec>,
}

impl Default for SpecTable {
    fn default() -> Self {
        crate::builtin::builtin_spec_table()
    }
}

impl SpecTable {
    /// Parse a spec table from JSON text (shape only; see `validate_spec_table`).
    pub fn from_json(content: &str) -> ValidationResult<Self> {
        serde_json::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// Read and parse a spec table file. The raw text comes back alongside
    /// the table so callers can fingerprint exactly what was parsed.
    pub fn read_file(path: &Path) -> ValidationResult<(Self, String)> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {e}", path.display())))?;
        let table = Self::from_json(&content).map_err(|e| match e {
            ValidationError::ParseError(msg) => {
                ValidationError::ParseError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        Ok((table, content))
    }

    /// First model whose name fragment is contained in `observed`.
    pub fn find_model(&self, observed: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|m| observed.contains(m.name.as_str()))
    }

    /// The model named by `default_model`.
    pub fn default_model_spec(&self) -> Option<&ModelSpec> {
        self.models.iter().find(|m| m.name == self.default_model)
    }

    /// Resolve an observed model name, falling back to the default model.
    ///
    /// Only returns `None` for a table that failed validation (no default).
    pub fn resolve_model(&self, observed: &str) -> Option<&ModelSpec> {
        self.find_model(observed)
            .or_else(|| self.default_model_spec())
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}
