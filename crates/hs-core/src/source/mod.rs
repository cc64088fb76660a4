//! Record sources.
//!
//! A source hands over either a non-empty list of raw records or an error,
//! never both. Sources are read one after another; a failing source is
//! recorded and skipped, never retried.

pub mod file;
pub mod manifest;
pub mod table;

pub use file::{FileFormat, FileSource};
pub use manifest::{
    classify_location, model_from_location, parse_manifest, Location, SourceTarget,
    DEFAULT_LOCATION_MODEL,
};
pub use table::extract_records;

use hs_common::RawRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::{event_names, LogContext, Stage};

/// Why a source produced no records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("required columns not found ({detail})")]
    SchemaMismatch { detail: String },

    #[error("no table with BB/RB/台番 columns")]
    TableNotFound,

    #[error("source yielded no rows")]
    Empty,

    #[error("remote locations are not fetched; save the table as CSV: {0}")]
    Unsupported(String),
}

/// Anything that can produce raw records.
pub trait RecordSource {
    /// Label attached to failures (the date label for manifest sources).
    fn label(&self) -> &str;

    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError>;
}

/// A source that failed, as surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub label: String,
    pub message: String,
}

impl From<SourceFailure> for hs_common::Error {
    fn from(failure: SourceFailure) -> Self {
        hs_common::Error::Source {
            label: failure.label,
            message: failure.message,
        }
    }
}

/// Everything collected from a set of sources.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub records: Vec<RawRecord>,
    pub failures: Vec<SourceFailure>,
    /// Number of sources that contributed records.
    pub succeeded: usize,
}

/// Manifest location that cannot be read locally.
#[derive(Debug, Clone)]
pub struct UnreadableSource {
    label: String,
    location: String,
}

impl RecordSource for UnreadableSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        Err(SourceError::Unsupported(self.location.clone()))
    }
}

/// Build a source for one manifest entry.
///
/// Local paths (and `file://` URLs) become [`FileSource`]s with the model
/// taken from the location's `kishu` parameter. Relative paths are resolved
/// against `base_dir`, normally the manifest's directory.
pub fn source_for_target(target: &SourceTarget, base_dir: &Path) -> Box<dyn RecordSource> {
    let model = model_from_location(&target.location);
    match classify_location(&target.location) {
        Location::Path(path) => {
            let path = if path.is_relative() {
                base_dir.join(path)
            } else {
                path
            };
            Box::new(FileSource::new(&target.label, path, model))
        }
        Location::Remote(_) => Box::new(UnreadableSource {
            label: target.label.clone(),
            location: target.location.clone(),
        }),
    }
}

/// Read every source in order.
pub fn collect_sources(sources: &[Box<dyn RecordSource>], ctx: &LogContext) -> SourceBatch {
    let mut batch = SourceBatch::default();
    for source in sources {
        let result = source.fetch().and_then(|records| {
            if records.is_empty() {
                Err(SourceError::Empty)
            } else {
                Ok(records)
            }
        });
        match result {
            Ok(records) => {
                crate::log_event!(
                    ctx,
                    INFO,
                    event_names::FETCH_SOURCE_LOADED,
                    Stage::Fetch,
                    "source loaded",
                    label = source.label(),
                    rows = records.len()
                );
                batch.succeeded += 1;
                batch.records.extend(records);
            }
            Err(err) => {
                crate::log_event!(
                    ctx,
                    WARN,
                    event_names::FETCH_SOURCE_FAILED,
                    Stage::Fetch,
                    "source failed",
                    label = source.label(),
                    error = tracing::field::display(&err)
                );
                batch.failures.push(SourceFailure {
                    label: source.label().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    batch
}
