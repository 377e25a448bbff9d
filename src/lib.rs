pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalStorage;
pub use config::sources::{FileSource, HttpSource, Source};

pub use crate::core::{
    column_table::{ColumnTables, DomainTable},
    etl::EtlEngine,
    normalizer::normalize,
    pipeline::CoveragePipeline,
    store::{CoverageStore, LoadState},
};
pub use domain::model::{Client, CoverageData, Domain, RowRecord, SpecialtyGroup};
pub use utils::error::{CoverageError, Result};
