use crate::core::column_table::ColumnTables;
use crate::core::workbook::SourceFormat;
use crate::core::ConfigProvider;
use crate::domain::model::Domain;
use crate::utils::error::{CoverageError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const ENV_VAR_PATTERN: &str = r"\$\{([^}]+)\}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    /// Per-domain overrides keyed by `data`, `automation` or `infrastructure`.
    #[serde(default)]
    pub domains: BTreeMap<String, DomainOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub location: String,
    #[serde(default)]
    pub format: SourceFormat,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainOverride {
    pub sheet: Option<String>,
    pub columns: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CoverageError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COVERAGE_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = env_var_pattern()?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        // 未設定的環境變數會原樣留在字串裡
        check_resolved("source.location", &self.source.location)?;
        check_resolved("load.output_path", &self.load.output_path)?;

        validation::validate_source_location("source.location", &self.source.location)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        for (key, domain_override) in &self.domains {
            let field = format!("domains.{}", key);
            if Domain::from_key(key).is_none() {
                return Err(CoverageError::InvalidConfigValue {
                    field,
                    value: key.clone(),
                    reason: "Unknown domain. Valid domains: data, automation, infrastructure"
                        .to_string(),
                });
            }
            if let Some(sheet) = &domain_override.sheet {
                validation::validate_non_empty_string(&format!("{}.sheet", field), sheet)?;
            }
            if let Some(columns) = &domain_override.columns {
                for column in columns {
                    validation::validate_non_empty_string(&format!("{}.columns", field), column)?;
                }
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("coverage")
    }
}

fn env_var_pattern() -> Result<Regex> {
    Regex::new(ENV_VAR_PATTERN).map_err(|e| CoverageError::Config {
        message: format!("invalid substitution pattern: {}", e),
    })
}

fn check_resolved(field: &str, value: &str) -> Result<()> {
    match env_var_pattern()?.captures(value) {
        Some(caps) => Err(CoverageError::MissingConfig {
            field: format!("{} (environment variable {} is not set)", field, &caps[1]),
        }),
        None => Ok(()),
    }
}

impl ConfigProvider for TomlConfig {
    fn source_location(&self) -> &str {
        &self.source.location
    }

    fn source_format(&self) -> SourceFormat {
        self.source.format
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn column_tables(&self) -> ColumnTables {
        let mut tables = ColumnTables::builtin();
        for (key, domain_override) in &self.domains {
            let Some(domain) = Domain::from_key(key) else {
                continue;
            };
            if let Some(sheet) = &domain_override.sheet {
                tables = tables.with_sheet_name(domain, sheet.clone());
            }
            if let Some(columns) = &domain_override.columns {
                tables = tables.with_columns(domain, columns.clone());
            }
        }
        tables
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
