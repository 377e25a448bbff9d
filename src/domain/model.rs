use crate::domain::ordered::OrderedMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coverage category; each one is backed by its own sheet and column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Data,
    Automation,
    Infrastructure,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Data, Domain::Automation, Domain::Infrastructure];

    pub fn key(self) -> &'static str {
        match self {
            Domain::Data => "data",
            Domain::Automation => "automation",
            Domain::Infrastructure => "infrastructure",
        }
    }

    /// Sheet name in the reference workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Domain::Data => "Data",
            Domain::Automation => "Automation",
            Domain::Infrastructure => "Infrastructure",
        }
    }

    pub fn from_key(key: &str) -> Option<Domain> {
        Domain::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One worksheet row: column header to cell text. Empty cells are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    pub cells: HashMap<String, String>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Cell text, `""` when the column is absent.
    pub fn text(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// First non-blank value among alternative header spellings. The value
    /// is returned as written, untrimmed.
    pub fn first_text(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .map(|column| self.text(column))
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
    }
}

/// A decoded worksheet: header row plus the non-blank data rows under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<RowRecord>,
}

/// Sheets of one workbook, in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

/// Personnel of one specialty within a single client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyGroup {
    /// Union of every sub-specialty list, first-seen order, no duplicates.
    pub personnel: Vec<String>,
    /// Keyed by the full sub-specialty column name, in column-table order.
    pub sub_specialties: OrderedMap<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub coverage_name: String,
    pub client_sub_type: String,
    pub coverage: String,
    pub specialties: OrderedMap<SpecialtyGroup>,
}

impl Client {
    pub fn specialty(&self, name: &str) -> Option<&SpecialtyGroup> {
        self.specialties.get(name)
    }
}

/// The three normalized client lists handed to the view layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageData {
    pub data: Vec<Client>,
    pub automation: Vec<Client>,
    pub infrastructure: Vec<Client>,
}

impl CoverageData {
    pub fn get(&self, domain: Domain) -> &[Client] {
        match domain {
            Domain::Data => &self.data,
            Domain::Automation => &self.automation,
            Domain::Infrastructure => &self.infrastructure,
        }
    }

    pub fn set(&mut self, domain: Domain, clients: Vec<Client>) {
        match domain {
            Domain::Data => self.data = clients,
            Domain::Automation => self.automation = clients,
            Domain::Infrastructure => self.infrastructure = clients,
        }
    }

    pub fn total_clients(&self) -> usize {
        self.data.len() + self.automation.len() + self.infrastructure.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_record_header_fallback() {
        let row = RowRecord::new()
            .with_cell("Coverage Name", "")
            .with_cell("CoverageName", "Acme Corp");

        assert_eq!(row.first_text(&["Coverage Name", "CoverageName"]), "Acme Corp");
        assert_eq!(row.text("Coverage"), "");
    }

    #[test]
    fn test_client_serializes_camel_case() {
        let client = Client {
            coverage_name: "Acme Corp".to_string(),
            client_sub_type: "Strategic".to_string(),
            coverage: "Named".to_string(),
            specialties: OrderedMap::new(),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["coverageName"], "Acme Corp");
        assert_eq!(json["clientSubType"], "Strategic");
        assert!(json["specialties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_domain_keys() {
        assert_eq!(Domain::from_key("automation"), Some(Domain::Automation));
        assert_eq!(Domain::Infrastructure.sheet_name(), "Infrastructure");
        assert_eq!(Domain::from_key("people"), None);
    }
}
