//! Turns worksheet rows into [`Client`]s with nested specialty groups.
//!
//! Pure: no logging, no I/O. Malformed input degrades to empty values, it
//! never fails.

use crate::core::column_table::specialty_of;
use crate::domain::model::{Client, RowRecord, SpecialtyGroup};
use crate::domain::ordered::OrderedMap;

pub const COVERAGE_NAME_HEADERS: [&str; 2] = ["Coverage Name", "CoverageName"];
pub const CLIENT_SUB_TYPE_HEADERS: [&str; 2] = ["Client Sub Type", "ClientSubType"];
pub const COVERAGE_HEADERS: [&str; 1] = ["Coverage"];

/// Personnel delimiter inside a cell.
pub const PERSONNEL_DELIMITER: char = ',';

/// Splits a cell into trimmed, non-empty names. Duplicates are kept.
pub fn split_personnel(cell: &str) -> Vec<String> {
    cell.split(PERSONNEL_DELIMITER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Groups the row's personnel cells by specialty, walking `columns` in order.
///
/// A specialty only appears once one of its columns holds at least one name.
pub fn group_by_specialty<S: AsRef<str>>(
    row: &RowRecord,
    columns: &[S],
) -> OrderedMap<SpecialtyGroup> {
    let mut specialties = OrderedMap::new();

    for key in columns {
        let key = key.as_ref();
        let personnel = split_personnel(row.text(key));
        if personnel.is_empty() {
            continue;
        }

        let group = specialties.get_or_insert_with(specialty_of(key), SpecialtyGroup::default);
        for person in &personnel {
            if !group.personnel.contains(person) {
                group.personnel.push(person.clone());
            }
        }
        group.sub_specialties.insert(key, personnel);
    }

    specialties
}

pub fn normalize_row<S: AsRef<str>>(row: &RowRecord, columns: &[S]) -> Client {
    Client {
        coverage_name: row.first_text(&COVERAGE_NAME_HEADERS).to_string(),
        client_sub_type: row.first_text(&CLIENT_SUB_TYPE_HEADERS).to_string(),
        coverage: row.first_text(&COVERAGE_HEADERS).to_string(),
        specialties: group_by_specialty(row, columns),
    }
}

/// Normalizes every row against one domain's column table.
///
/// Row order is preserved. Rows with a blank coverage name are dropped;
/// rows sharing a coverage name are passed through, not merged.
pub fn normalize<S: AsRef<str>>(rows: &[RowRecord], columns: &[S]) -> Vec<Client> {
    rows.iter()
        .map(|row| normalize_row(row, columns))
        .filter(|client| !client.coverage_name.trim().is_empty())
        .collect()
}
