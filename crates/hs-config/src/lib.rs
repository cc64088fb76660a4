//! Hall Scout configuration: the spec table.
//!
//! This crate provides:
//! - Typed structs for spec_table.json (model → setting → intervals)
//! - The built-in table for the eight supported machine families
//! - Config resolution (CLI → env → XDG → built-in)
//! - Semantic validation with non-fatal warnings

pub mod builtin;
pub mod resolve;
pub mod spec_table;
pub mod validate;

pub use resolve::{resolve_spec_table, ConfigSource, SpecTablePath};
pub use spec_table::{ModelSpec, SettingSpec, SpecTable};
pub use validate::{validate_spec_table, ValidationError, ValidationResult, ValidationWarning};

/// Schema version for spec table files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
