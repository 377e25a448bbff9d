//! Reader for the older CSV export of the Data coverage sheet.
//!
//! That export has no usable header names: the columns are positional and
//! each personnel cell holds a single name. Rows are re-keyed by the `data`
//! column table so they normalize exactly like workbook rows.

use crate::core::column_table::DATA_COLUMNS;
use crate::domain::model::{Domain, RowRecord, Sheet, Workbook};
use crate::utils::error::Result;
use csv::ReaderBuilder;

const COVERAGE_NAME: usize = 1;
const CLIENT_SUB_TYPE: usize = 2;
// 3..=6 are leader, ATL manager, TSR and ATL; the model has no field for them.
const COVERAGE: usize = 7;
/// Data BTS (8 columns), Data CSM (6), Data CE (2), in table order.
const FIRST_SPECIALTY_COLUMN: usize = 8;

pub fn decode_legacy_csv(bytes: &[u8]) -> Result<Workbook> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |index: usize| record.get(index).map(str::trim).unwrap_or("");

        let mut row = RowRecord::new();
        let mut put = |column: &str, value: &str| {
            if !value.is_empty() {
                row.set(column, value);
            }
        };

        put("Coverage Name", field(COVERAGE_NAME));
        put("Client Sub Type", field(CLIENT_SUB_TYPE));
        put("Coverage", field(COVERAGE));
        for (offset, column) in DATA_COLUMNS.iter().enumerate() {
            put(column, field(FIRST_SPECIALTY_COLUMN + offset));
        }

        if !row.cells.is_empty() {
            rows.push(row);
        }
    }

    let mut columns = vec![
        "Coverage Name".to_string(),
        "Client Sub Type".to_string(),
        "Coverage".to_string(),
    ];
    columns.extend(DATA_COLUMNS.iter().map(|c| c.to_string()));

    Ok(Workbook {
        sheets: vec![Sheet {
            name: Domain::Data.sheet_name().to_string(),
            columns,
            rows,
        }],
    })
}
