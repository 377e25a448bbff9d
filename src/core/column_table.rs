use crate::core::normalizer::normalize;
use crate::domain::model::{Client, Domain, RowRecord};
use std::collections::BTreeMap;

/// Separator between the specialty and sub-specialty parts of a column header.
pub const KEY_DELIMITER: &str = " - ";

pub const DATA_COLUMNS: [&str; 16] = [
    "Data BTS - SLM",
    "Data BTS - FLM",
    "Data BTS - AI Assistants",
    "Data BTS - AI/MLOps",
    "Data BTS - Databases",
    "Data BTS - Data Intelligence",
    "Data BTS - Data Integration",
    "Data BTS - Data Security",
    "Data CSM - SLM",
    "Data CSM - FLM",
    "Data CSM - AI Assistants",
    "Data CSM - AI/ML Ops",
    "Data CSM - Data",
    "Data CSM - Security",
    "Data CE - SLM",
    "Data CE - FLM",
];

// Header spellings must match the sheet, typos included.
pub const AUTOMATION_COLUMNS: [&str; 16] = [
    "Auto BTS - SLM",
    "Auto BTS - FLM",
    "Auto BTS - App Development",
    "Auto BTS - App Integration",
    "Auto BTS - Network Mgmt",
    "Auto BTS - Identifty & Access Mgmt",
    "Auto BTS - IT Auto & FinOps",
    "Auto BTS - Asset LifeCycle Mgmt",
    "Auto CSM - SLM",
    "Auto CSM - FLM",
    "Auto CSM - Dev & App Integration",
    "Auto CSM - Infra Delivery",
    "Auto CSM - IT Auto & FinOps",
    "Auto CSM - Asset LifeCycle Mgmt",
    "Auto CE - SLM",
    "Auto CE - FLM",
];

pub const INFRASTRUCTURE_COLUMNS: [&str; 21] = [
    "Power & Cloud - SLM",
    "Power & Cloud - FLM",
    "Power & Cloud - BTS",
    "Cloud CSM - SLM",
    "Cloud CSM - FLM",
    "Cloud CSM",
    "Storage BTS - SLM",
    "Storage BTS - FLM",
    "Storage BTS - Enterprise Storage",
    "Storage BTS - Data Resilience",
    "Storage BTS - Hybrid Cloud & AI",
    "Storage SME - Hyperscaler/H.Cloud&AI",
    "Storage SME - Data Resilience",
    "zStack BTS - FLM",
    "zStack BTS - zCA",
    "zStack BTS - zHW BTS",
    "zStack BTS - zSW Data",
    "zStack BTS - zSW Modernization",
    "zStack BTS - zSW AIOps / Security",
    "Z CSM - SLM",
    "Z CSM - ZTPS (WCA4Z, Test Acclerator for Z)",
];

pub fn builtin_columns(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Data => &DATA_COLUMNS,
        Domain::Automation => &AUTOMATION_COLUMNS,
        Domain::Infrastructure => &INFRASTRUCTURE_COLUMNS,
    }
}

/// Specialty part of a sub-specialty key: everything before the first
/// delimiter, or the whole key when there is none.
pub fn specialty_of(key: &str) -> &str {
    key.split_once(KEY_DELIMITER)
        .map(|(specialty, _)| specialty)
        .unwrap_or(key)
}

/// Sub-specialty label of a key; a key without delimiter labels itself.
pub fn sub_specialty_label(key: &str) -> &str {
    key.split_once(KEY_DELIMITER)
        .map(|(_, label)| label)
        .unwrap_or(key)
}

/// Sheet name and ordered column list for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTable {
    pub domain: Domain,
    pub sheet_name: String,
    pub columns: Vec<String>,
}

impl DomainTable {
    pub fn builtin(domain: Domain) -> Self {
        Self {
            domain,
            sheet_name: domain.sheet_name().to_string(),
            columns: builtin_columns(domain)
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }

    /// Distinct specialties in first-column order.
    pub fn specialties(&self) -> Vec<&str> {
        let mut specialties: Vec<&str> = Vec::new();
        for key in &self.columns {
            let specialty = specialty_of(key);
            if !specialties.contains(&specialty) {
                specialties.push(specialty);
            }
        }
        specialties
    }

    pub fn normalize(&self, rows: &[RowRecord]) -> Vec<Client> {
        normalize(rows, &self.columns)
    }
}

/// Lookup from domain to its table. Replaces per-sheet branching: every
/// domain goes through the same normalization with its own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTables {
    tables: BTreeMap<Domain, DomainTable>,
}

impl ColumnTables {
    pub fn builtin() -> Self {
        Self {
            tables: Domain::ALL
                .into_iter()
                .map(|domain| (domain, DomainTable::builtin(domain)))
                .collect(),
        }
    }

    pub fn get(&self, domain: Domain) -> Option<&DomainTable> {
        self.tables.get(&domain)
    }

    pub fn with_sheet_name(mut self, domain: Domain, sheet_name: impl Into<String>) -> Self {
        self.table_mut(domain).sheet_name = sheet_name.into();
        self
    }

    pub fn with_columns(mut self, domain: Domain, columns: Vec<String>) -> Self {
        self.table_mut(domain).columns = columns;
        self
    }

    fn table_mut(&mut self, domain: Domain) -> &mut DomainTable {
        self.tables
            .entry(domain)
            .or_insert_with(|| DomainTable::builtin(domain))
    }

    /// Tables in domain order (data, automation, infrastructure).
    pub fn iter(&self) -> impl Iterator<Item = &DomainTable> {
        self.tables.values()
    }
}

impl Default for ColumnTables {
    fn default() -> Self {
        Self::builtin()
    }
}
