//! Spec table loading for hs-core.
//!
//! This module handles:
//! - Resolving the spec table path (CLI > env > XDG > built-in)
//! - Shape checking via serde and semantic validation via hs-config
//! - A provenance snapshot embedded in command output

pub use hs_config::{
    ConfigSource, ModelSpec, SettingSpec, SpecTable, ValidationError, ValidationWarning,
};

use hs_config::{resolve_spec_table, validate_spec_table};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the spec table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Spec table validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl From<ConfigError> for hs_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(
                e @ (ValidationError::IoError(_) | ValidationError::ParseError(_)),
            ) => hs_common::Error::Config(e.to_string()),
            ConfigError::ValidationError(e) => hs_common::Error::InvalidSpecTable(e.to_string()),
        }
    }
}

/// Spec table with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub spec_table: SpecTable,
    /// None when the built-in table is used.
    pub spec_table_path: Option<PathBuf>,
    /// SHA-256 of the file content (None for the built-in table).
    pub spec_table_hash: Option<String>,
    pub source: ConfigSource,
    /// Non-fatal findings from validation.
    pub warnings: Vec<ValidationWarning>,
}

impl ResolvedConfig {
    /// Create a provenance snapshot for command output.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            spec_table_path: self.spec_table_path.clone(),
            spec_table_hash: self.spec_table_hash.clone(),
            schema_version: self.spec_table.schema_version.clone(),
            source: self.source.to_string(),
            model_count: self.spec_table.models.len(),
            default_model: self.spec_table.default_model.clone(),
        }
    }
}

/// Provenance of the spec table used for a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSnapshot {
    pub spec_table_path: Option<PathBuf>,
    pub spec_table_hash: Option<String>,
    pub schema_version: String,
    pub source: String,
    pub model_count: usize,
    pub default_model: String,
}

/// Spec table resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit spec table path (highest priority).
    pub spec_table_path: Option<PathBuf>,
}

/// Load and validate the spec table with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let resolved = resolve_spec_table(options.spec_table_path.as_deref());

    let (spec_table, spec_table_path, spec_table_hash) = match resolved.path {
        Some(path) => {
            let (table, hash) = load_spec_table_from_file(&path)?;
            (table, Some(path), Some(hash))
        }
        None => (SpecTable::default(), None, None),
    };

    let warnings = validate_spec_table(&spec_table)?;

    Ok(ResolvedConfig {
        spec_table,
        spec_table_path,
        spec_table_hash,
        source: resolved.source,
        warnings,
    })
}

fn load_spec_table_from_file(path: &Path) -> Result<(SpecTable, String), ConfigError> {
    let (table, content) = SpecTable::read_file(path)?;
    Ok((table, compute_hash(&content)))
}

/// Hex-encoded SHA-256 of `content`.
fn compute_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_config::builtin::builtin_spec_table;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn explicit_file_loads_with_hash() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::to_string(&builtin_spec_table()).unwrap();
        let path = write_json(&dir, "table.json", &json);

        let config = load_config(&ConfigOptions {
            spec_table_path: Some(path.clone()),
        })
        .unwrap();

        assert_eq!(config.source, ConfigSource::CliArgument);
        assert_eq!(config.spec_table_path, Some(path));
        let hash = config.spec_table_hash.clone().unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, compute_hash(&json));

        let snapshot = config.snapshot();
        assert_eq!(snapshot.model_count, 8);
        assert_eq!(snapshot.source, "CLI argument");
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let err = load_config(&ConfigOptions {
            spec_table_path: Some(PathBuf::from("/nonexistent/hs/spec_table.json")),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError(ValidationError::IoError(_))
        ));
        let common: hs_common::Error = err.into();
        assert_eq!(common.code(), 10);
    }

    #[test]
    fn invalid_table_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut table = builtin_spec_table();
        table.models[0].settings.remove(&6);
        let path = write_json(&dir, "bad.json", &serde_json::to_string(&table).unwrap());

        let err = load_config(&ConfigOptions {
            spec_table_path: Some(path),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let common: hs_common::Error = err.into();
        assert_eq!(common.code(), 11);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, "broken.json", "{\"schema_version\": ");
        let err = load_config(&ConfigOptions {
            spec_table_path: Some(path),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError(ValidationError::ParseError(_))
        ));
        let common: hs_common::Error = err.into();
        assert_eq!(common.code(), 10);
    }

    #[test]
    fn stale_schema_version_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut table = builtin_spec_table();
        table.schema_version = "0.9.0".to_string();
        let path = write_json(&dir, "old.json", &serde_json::to_string(&table).unwrap());

        let err = load_config(&ConfigOptions {
            spec_table_path: Some(path),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError(ValidationError::VersionMismatch { .. })
        ));
        let common: hs_common::Error = err.into();
        assert_eq!(common.code(), 11);
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(compute_hash("abc"), compute_hash("abc"));
        assert_ne!(compute_hash("abc"), compute_hash("abd"));
    }
}
