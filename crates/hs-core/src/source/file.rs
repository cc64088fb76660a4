//! Local file source.
//!
//! Two formats, chosen by extension:
//! - `.json`: an array of raw records, used as-is
//! - anything else: a headerless CSV of the page's data table (first row is
//!   the table header), run through table extraction

use hs_common::RawRecord;
use std::path::{Path, PathBuf};

use super::table::extract_records;
use super::{RecordSource, SourceError};

/// File format of a local source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    CsvTable,
}

impl FileFormat {
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::CsvTable,
        }
    }
}

/// A table saved to disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    label: String,
    path: PathBuf,
    model: String,
    format: FileFormat,
}

impl FileSource {
    /// `model` is attached to every CSV row; JSON records carry their own.
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        let path = path.into();
        let format = FileFormat::detect(&path);
        FileSource {
            label: label.into(),
            path,
            model: model.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<String, SourceError> {
        let bytes = std::fs::read(&self.path).map_err(|e| SourceError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let text = String::from_utf8(bytes).map_err(|e| SourceError::Parse {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;
        // Spreadsheet exports often start with a BOM.
        Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
    }

    fn parse_csv_table(&self, contents: &str) -> Result<Vec<Vec<String>>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let mut table = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| SourceError::Parse {
                path: self.path.clone(),
                detail: e.to_string(),
            })?;
            table.push(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }
}

impl RecordSource for FileSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        let contents = self.read_contents()?;
        match self.format {
            FileFormat::Json => serde_json::from_str(&contents).map_err(|e| SourceError::Parse {
                path: self.path.clone(),
                detail: e.to_string(),
            }),
            FileFormat::CsvTable => {
                let table = self.parse_csv_table(&contents)?;
                extract_records(&self.label, &self.model, &table)
            }
        }
    }
}
