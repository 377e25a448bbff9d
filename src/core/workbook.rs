use crate::core::legacy_csv::decode_legacy_csv;
use crate::domain::model::{RowRecord, Sheet, Workbook};
use crate::utils::error::Result;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Layout of the fetched bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Pick from the location's extension.
    #[default]
    Auto,
    /// xlsx / xlsm / xlsb / xls / ods.
    Workbook,
    /// Older single-sheet CSV export with positional columns.
    LegacyCsv,
}

impl SourceFormat {
    pub fn resolve(self, location: &str) -> SourceFormat {
        match self {
            SourceFormat::Auto => {
                let path = location.split(['?', '#']).next().unwrap_or(location);
                if path.to_ascii_lowercase().ends_with(".csv") {
                    SourceFormat::LegacyCsv
                } else {
                    SourceFormat::Workbook
                }
            }
            resolved => resolved,
        }
    }
}

pub fn decode(bytes: &[u8], format: SourceFormat) -> Result<Workbook> {
    match format {
        SourceFormat::LegacyCsv => decode_legacy_csv(bytes),
        SourceFormat::Workbook | SourceFormat::Auto => decode_workbook(bytes),
    }
}

/// Decodes spreadsheet bytes into sheets of header-keyed rows.
pub fn decode_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut sheets = Vec::new();
    for name in reader.sheet_names() {
        let range = reader.worksheet_range(&name)?;
        sheets.push(sheet_from_range(name, &range));
    }

    Ok(Workbook { sheets })
}

/// First row of the used range is the header; blank rows are skipped.
pub fn sheet_from_range(name: String, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Sheet {
            name,
            ..Sheet::default()
        };
    };

    // Blank and repeated headers are not addressable; the first column wins.
    let mut columns: Vec<String> = Vec::new();
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| {
            let header = cell_text(cell);
            if header.is_empty() || columns.contains(&header) {
                None
            } else {
                columns.push(header.clone());
                Some(header)
            }
        })
        .collect();

    let records = rows
        .filter_map(|row| record_from_cells(&headers, row))
        .collect();

    Sheet {
        name,
        columns,
        rows: records,
    }
}

fn record_from_cells(headers: &[Option<String>], row: &[Data]) -> Option<RowRecord> {
    let mut record = RowRecord::new();

    for (header, cell) in headers.iter().zip(row) {
        let Some(header) = header else {
            continue;
        };
        let value = cell_text(cell);
        if !value.is_empty() {
            record.set(header.clone(), value);
        }
    }

    if record.cells.is_empty() {
        None
    } else {
        Some(record)
    }
}

/// Formatted text of a cell, the way it reads in the sheet.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_of(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_cell_text_formats() {
        assert_eq!(cell_text(&Data::Float(42.0)), "42");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_header_row_keys_records() {
        let range = range_of(vec![
            vec![text("Coverage Name"), text("Data BTS - SLM"), text("")],
            vec![text("Acme Corp"), text("Jane Doe"), text("ignored")],
            vec![Data::Empty, Data::Empty, Data::Empty],
            vec![text("Globex"), Data::Empty, Data::Empty],
        ]);

        let sheet = sheet_from_range("Data".to_string(), &range);
        assert_eq!(sheet.columns, vec!["Coverage Name", "Data BTS - SLM"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].text("Data BTS - SLM"), "Jane Doe");
        assert!(!sheet.rows[0].cells.contains_key(""));
        assert_eq!(sheet.rows[1].text("Coverage Name"), "Globex");
        assert_eq!(sheet.rows[1].text("Data BTS - SLM"), "");
    }

    #[test]
    fn test_duplicate_header_keeps_first_column() {
        let range = range_of(vec![
            vec![text("Coverage Name"), text("Coverage Name")],
            vec![text("First"), text("Second")],
        ]);

        let sheet = sheet_from_range("Data".to_string(), &range);
        assert_eq!(sheet.rows[0].text("Coverage Name"), "First");
    }

    #[test]
    fn test_empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        let sheet = sheet_from_range("Automation".to_string(), &range);
        assert!(sheet.rows.is_empty());
        assert!(sheet.columns.is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(decode_workbook(b"definitely not a workbook").is_err());
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            SourceFormat::Auto.resolve("https://host/coverage.CSV?v=2"),
            SourceFormat::LegacyCsv
        );
        assert_eq!(
            SourceFormat::Auto.resolve("public/coverage.xlsx"),
            SourceFormat::Workbook
        );
        assert_eq!(
            SourceFormat::Workbook.resolve("export.csv"),
            SourceFormat::Workbook
        );
    }
}
