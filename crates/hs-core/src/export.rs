//! CSV export of estimated records.
//!
//! The file starts with a UTF-8 BOM so spreadsheet tools pick the right
//! encoding for the Japanese model names.

use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inference::EstimatedRecord;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const EXPORT_HEADER: [&str; 8] = [
    "date",
    "machine_id",
    "model",
    "spins",
    "small_wins",
    "big_wins",
    "most_likely_setting",
    "high_setting_probability",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ExportError> for hs_common::Error {
    fn from(err: ExportError) -> Self {
        hs_common::Error::Export(err.to_string())
    }
}

/// Write `records` as CSV, header first, in input order.
pub fn write_csv<W: Write>(mut writer: W, records: &[EstimatedRecord]) -> Result<(), ExportError> {
    writer.write_all(BOM).map_err(csv::Error::from)?;
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXPORT_HEADER)?;
    for record in records {
        let obs = &record.observation;
        csv.write_record([
            obs.date_label.clone(),
            obs.machine_id.clone(),
            obs.model.clone(),
            obs.spins.to_string(),
            obs.small_wins.to_string(),
            obs.big_wins.to_string(),
            record.posterior.most_likely_setting.to_string(),
            record.posterior.high_setting_probability.to_string(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `records` to `path`, replacing any existing file.
pub fn write_csv_file(path: &Path, records: &[EstimatedRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_csv(std::io::BufWriter::new(file), records)
}

/// `analysis_YYYYMMDD_HHMM.csv` for the given local time.
pub fn default_export_name(now: NaiveDateTime) -> String {
    format!("analysis_{}.csv", now.format("%Y%m%d_%H%M"))
}
