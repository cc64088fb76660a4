//! Error types for Hall Scout.
//!
//! Data-quality problems (a non-numeric spin cell, an odd machine id) are not
//! errors here: they degrade results instead. This type covers the conditions
//! that are surfaced to the caller as discrete values, each with:
//! - a stable numeric code
//! - a category for grouping
//! - a remediation hint for humans
//!
//! Errors serialize for JSON output as:
//! ```json
//! {
//!   "code": 21,
//!   "category": "source",
//!   "message": "source 2/7 failed: no table with BB/RB/台番 columns",
//!   "recoverable": true,
//!   "remediation": "..."
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Hall Scout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Spec table and CLI configuration errors.
    Config,
    /// Per-source fetch or schema failures.
    Source,
    /// Nothing left to analyse.
    Data,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Source => write!(f, "source"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Hall Scout.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid spec table: {0}")]
    InvalidSpecTable(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    // Source errors (20-29)
    #[error("source {label} failed: {message}")]
    Source { label: String, message: String },

    #[error("source manifest has no usable lines")]
    EmptyManifest,

    // Data errors (30-39)
    #[error("no usable records survived normalization")]
    EmptyBatch,

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export failed: {0}")]
    Export(String),
}

impl Error {
    /// Stable error code, grouped by category.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSpecTable(_) => 11,
            Error::InvalidArgs(_) => 12,
            Error::Source { .. } => 20,
            Error::EmptyManifest => 21,
            Error::EmptyBatch => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Export(_) => 62,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSpecTable(_) | Error::InvalidArgs(_) => {
                ErrorCategory::Config
            }
            Error::Source { .. } | Error::EmptyManifest => ErrorCategory::Source,
            Error::EmptyBatch => ErrorCategory::Data,
            Error::Io(_) | Error::Json(_) | Error::Export(_) => ErrorCategory::Io,
        }
    }

    /// Whether re-running after user action can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidSpecTable(_) | Error::InvalidArgs(_) => true,
            Error::Source { .. } | Error::EmptyManifest => true,
            Error::EmptyBatch => true,
            Error::Io(_) | Error::Export(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check --spec-table / HALL_SCOUT_SPEC_TABLE or remove the override.",
            Error::InvalidSpecTable(_) => {
                "Run 'hall-scout check' to see which model or setting is malformed."
            }
            Error::InvalidArgs(_) => "Run 'hall-scout --help' for usage.",
            Error::Source { .. } => {
                "The source was skipped. Verify the file exists and has 台番/G数/BB/RB columns."
            }
            Error::EmptyManifest => "Write one 'label, location' pair per line.",
            Error::EmptyBatch => {
                "Every source failed or held only zero-spin rows. Check the per-source messages."
            }
            Error::Io(_) => "Check the path, permissions, and free disk space.",
            Error::Json(_) => "The JSON document is malformed; validate it with 'jq .'.",
            Error::Export(_) => "Choose a writable export path.",
        }
    }

    /// Structured form used by the JSON error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "category": self.category(),
            "message": self.to_string(),
            "recoverable": self.is_recoverable(),
            "remediation": self.remediation(),
        })
    }
}
