//! Structured event vocabulary: stages, event names, and the per-run context.

use serde::{Deserialize, Serialize};

/// Processing stages in the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and spec table loading.
    Init,
    /// Reading sources.
    Fetch,
    /// Raw row validation.
    Normalize,
    /// Posterior computation.
    Estimate,
    /// Grouped summaries and layout.
    Aggregate,
    /// CSV export.
    Export,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Fetch => "fetch",
            Stage::Normalize => "normalize",
            Stage::Estimate => "estimate",
            Stage::Aggregate => "aggregate",
            Stage::Export => "export",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_WARNING: &str = "config.warning";

    // Fetch stage
    pub const FETCH_SOURCE_LOADED: &str = "fetch.source_loaded";
    pub const FETCH_SOURCE_FAILED: &str = "fetch.source_failed";

    // Normalize stage
    pub const NORMALIZE_ROW_DROPPED: &str = "normalize.row_dropped";
    pub const NORMALIZE_ROW_UNPLACED: &str = "normalize.row_unplaced";
    pub const NORMALIZE_FINISHED: &str = "normalize.finished";

    // Estimate stage
    pub const ESTIMATE_DEGENERATE: &str = "estimate.degenerate";
    pub const ESTIMATE_FINISHED: &str = "estimate.finished";

    // Export stage
    pub const EXPORT_WRITTEN: &str = "export.written";
}

/// Correlation IDs stamped onto every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub host_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            host_id: host_id.into(),
        }
    }
}
