//! Hall Scout common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Raw and typed observation records
//! - The `Setting` newtype and machine placement view
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod output;
pub mod record;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
pub use record::{MachinePlacement, ObservationRecord, RawRecord, Setting};

/// Version of the JSON documents emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";
