use crate::core::column_table::ColumnTables;
use crate::core::workbook::SourceFormat;
use crate::domain::model::{CoverageData, Domain, Workbook};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where the workbook bytes come from. Fetched once per load.
pub trait WorkbookSource: Send + Sync {
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    fn describe(&self) -> String;
}

/// Destination for rendered outputs.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_location(&self) -> &str;
    fn source_format(&self) -> SourceFormat;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn request_timeout(&self) -> Option<Duration>;
    fn column_tables(&self) -> ColumnTables;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Workbook>;
    async fn transform(&self, workbook: Workbook) -> Result<CoverageData>;
    async fn load(&self, data: CoverageData) -> Result<String>;
}

/// Diagnostics emitted at the load boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Fetched { source: String, bytes: usize },
    Decoded { sheets: Vec<String> },
    SheetMissing { domain: Domain, sheet: String },
    SheetEmpty { domain: Domain, sheet: String },
    SheetColumns { sheet: String, columns: Vec<String> },
    DomainNormalized { domain: Domain, rows: usize, clients: usize },
}

pub trait LoadObserver: Send + Sync {
    fn on_event(&self, event: &LoadEvent);
}
