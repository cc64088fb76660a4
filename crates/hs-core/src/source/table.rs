//! Data-table extraction.
//!
//! Hall data pages publish one table per model with a header row containing
//! 台番 (machine number), G数 (spins), BB and RB. The table arrives here as rows
//! of cell text; this module locates the columns and emits raw records.

use hs_common::RawRecord;

use super::SourceError;

/// Markers a table must contain somewhere to be a data table.
const TABLE_MARKERS: [&str; 3] = ["BB", "RB", "台番"];

const ID_HEADER: &str = "台番";
const SPINS_HEADER: &str = "G数";
const BIG_HEADER: &str = "BB";
const SMALL_HEADER: &str = "RB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    id: usize,
    spins: usize,
    big: usize,
    small: usize,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Option<Self> {
        let contains = |needle: &str| header.iter().position(|h| h.contains(needle));
        let exact = |needle: &str| header.iter().position(|h| h == needle);
        Some(ColumnMap {
            id: contains(ID_HEADER)?,
            spins: contains(SPINS_HEADER)?,
            big: exact(BIG_HEADER)?,
            small: exact(SMALL_HEADER)?,
        })
    }

    fn max_index(&self) -> usize {
        self.id.max(self.spins).max(self.big).max(self.small)
    }
}

fn clean_cell(cell: &str) -> String {
    cell.trim().replace(',', "")
}

/// Whether any cell of the table mentions every marker.
pub fn looks_like_data_table(table: &[Vec<String>]) -> bool {
    TABLE_MARKERS
        .iter()
        .all(|marker| table.iter().flatten().any(|cell| cell.contains(marker)))
}

/// Extract raw records from a table.
///
/// The first row is the header. Data rows shorter than the rightmost mapped
/// column are skipped. Count cells are passed on as text; the normalizer
/// decides what is numeric.
pub fn extract_records(
    label: &str,
    model: &str,
    table: &[Vec<String>],
) -> Result<Vec<RawRecord>, SourceError> {
    if !looks_like_data_table(table) {
        return Err(SourceError::TableNotFound);
    }
    let Some((header_row, rows)) = table.split_first() else {
        return Err(SourceError::TableNotFound);
    };

    let header: Vec<String> = header_row.iter().map(|c| c.trim().to_string()).collect();
    let columns = ColumnMap::from_header(&header).ok_or_else(|| SourceError::SchemaMismatch {
        detail: format!("header: {header:?}"),
    })?;

    let records = rows
        .iter()
        .filter(|row| row.len() > columns.max_index())
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|c| clean_cell(c)).collect();
            RawRecord {
                date_label: label.to_string(),
                machine_id: cells[columns.id].clone(),
                model: model.to_string(),
                spins: cells[columns.spins].clone(),
                small_wins: cells[columns.small].clone(),
                big_wins: cells[columns.big].clone(),
            }
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn maps_columns_by_header() {
        let t = table(&[
            &["台番号", "累計G数", "差枚", "BB", "RB", "合成"],
            &["1001", "6,012", "+500", "25", "24", "1/121"],
            &["1002", "0", "0", "0", "0", "-"],
        ]);
        let records = extract_records("2/7", "マイジャグラーV", &t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].machine_id, "1001");
        assert_eq!(records[0].spins, "6012");
        assert_eq!(records[0].big_wins, "25");
        assert_eq!(records[0].small_wins, "24");
        assert_eq!(records[0].date_label, "2/7");
        assert_eq!(records[0].model, "マイジャグラーV");
    }

    #[test]
    fn short_rows_skipped() {
        let t = table(&[
            &["台番", "G数", "BB", "RB"],
            &["1001", "5000"],
            &["1002", "4000", "15", "12"],
        ]);
        let records = extract_records("2/7", "m", &t).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].machine_id, "1002");
    }

    #[test]
    fn missing_markers_is_table_not_found() {
        let t = table(&[&["No.", "Games", "Big", "Reg"], &["1", "100", "1", "0"]]);
        assert!(matches!(
            extract_records("2/7", "m", &t),
            Err(SourceError::TableNotFound)
        ));
        assert!(matches!(
            extract_records("2/7", "m", &[]),
            Err(SourceError::TableNotFound)
        ));
    }

    #[test]
    fn bb_must_match_exactly() {
        // Markers present, but no header cell is exactly "BB" and no G数 column.
        let t = table(&[&["台番", "BB回数", "RB"], &["1", "1", "1"]]);
        match extract_records("2/7", "m", &t) {
            Err(SourceError::SchemaMismatch { detail }) => assert!(detail.contains("BB回数")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
