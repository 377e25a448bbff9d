#![allow(dead_code)]

use coverage_etl::core::workbook::SourceFormat;
use coverage_etl::CliConfig;
use rust_xlsxwriter::Workbook;

pub type SheetRows<'a> = &'a [&'a [&'a str]];

/// Builds an xlsx file in memory; empty strings leave the cell blank.
pub fn build_workbook(sheets: &[(&str, SheetRows<'_>)]) -> Vec<u8> {
    let mut book = Workbook::new();
    for (name, rows) in sheets {
        let sheet = book.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    book.save_to_buffer().unwrap()
}

pub fn cli_config(source: String, output_path: String, formats: &[&str]) -> CliConfig {
    CliConfig {
        source,
        format: SourceFormat::Auto,
        output_path,
        output_formats: formats.iter().map(|f| f.to_string()).collect(),
        timeout_seconds: None,
        verbose: false,
        monitor: false,
    }
}

pub const DATA_ROWS: SheetRows<'static> = &[
    &[
        "Coverage Name",
        "Client Sub Type",
        "Coverage",
        "Data BTS - SLM",
        "Data CSM - SLM",
        "Data BTS - FLM",
    ],
    &[
        "Acme Corp",
        "Strategic",
        "Named",
        "Jane Doe, John Roe",
        "",
        "John Roe, Ann Lee",
    ],
    &["", "Growth", "Territory", "Nobody Home", "", ""],
    &["Globex", "", "", "", "Sam Poe", ""],
];

pub const INFRASTRUCTURE_ROWS: SheetRows<'static> = &[
    &["CoverageName", "Cloud CSM", "Cloud CSM - SLM", "zStack BTS - zCA"],
    &["Initech", "Gus", "Hal", ""],
];
