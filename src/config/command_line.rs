use crate::config::sources;
use crate::core::column_table::ColumnTables;
use crate::core::workbook::SourceFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_output_formats, validate_path, validate_positive_number, validate_source_location,
    Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "coverage-etl")]
#[command(about = "Normalize a coverage workbook into per-domain client lists")]
pub struct CliConfig {
    /// Workbook location: a local path or an http(s) URL
    #[arg(long, default_value = sources::DEFAULT_SOURCE)]
    pub source: String,

    #[arg(long, value_enum, default_value = "auto")]
    pub format: SourceFormat,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    /// Abort the fetch after this many seconds (no limit by default)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase memory and timing")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn source_location(&self) -> &str {
        &self.source
    }

    fn source_format(&self) -> SourceFormat {
        self.format
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn column_tables(&self) -> ColumnTables {
        ColumnTables::builtin()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_source_location("source", &self.source)?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("output_formats", &self.output_formats)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["coverage-etl"]);
        assert_eq!(config.source, sources::DEFAULT_SOURCE);
        assert_eq!(config.format, SourceFormat::Auto);
        assert_eq!(config.output_formats, vec!["json".to_string()]);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "coverage-etl",
            "--source",
            "https://example.com/coverage.xlsx",
            "--output-formats",
            "json,csv",
            "--timeout-seconds",
            "0",
        ]);
        assert_eq!(config.output_formats.len(), 2);
        assert!(config.validate().is_err());
    }
}
