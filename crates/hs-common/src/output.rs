//! Output format specifications.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default)
    #[default]
    Json,

    /// Human-readable Markdown tables
    Md,

    /// One-line summary for quick checks
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Md => write!(f, "md"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}
