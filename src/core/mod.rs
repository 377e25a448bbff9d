pub mod column_table;
pub mod etl;
pub mod legacy_csv;
pub mod normalizer;
pub mod observer;
pub mod pipeline;
pub mod store;
pub mod workbook;

pub use crate::domain::model::{Client, CoverageData, Domain, RowRecord, Workbook};
pub use crate::domain::ports::{
    ConfigProvider, LoadEvent, LoadObserver, Pipeline, Storage, WorkbookSource,
};
pub use crate::utils::error::Result;
