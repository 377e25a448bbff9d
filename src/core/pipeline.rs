use crate::core::column_table::ColumnTables;
use crate::core::observer::TracingObserver;
use crate::core::workbook::decode;
use crate::core::{
    ConfigProvider, CoverageData, Domain, LoadEvent, LoadObserver, Pipeline, Storage,
    WorkbookSource, Workbook,
};
use crate::utils::error::Result;
use std::sync::Arc;

pub const JSON_OUTPUT: &str = "coverage.json";
pub const CSV_OUTPUT: &str = "coverage.csv";

/// Fetches the workbook once, normalizes each domain's sheet and writes the
/// rendered outputs.
pub struct CoveragePipeline<Src: WorkbookSource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
    tables: ColumnTables,
    observer: Arc<dyn LoadObserver>,
}

impl<Src: WorkbookSource, S: Storage, C: ConfigProvider> CoveragePipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        let tables = config.column_tables();
        Self {
            source,
            storage,
            config,
            tables,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Normalizes every domain of an already decoded workbook.
    ///
    /// A missing or empty sheet yields an empty list for that domain only.
    pub fn assemble(&self, workbook: &Workbook) -> CoverageData {
        let mut data = CoverageData::default();

        for table in self.tables.iter() {
            let Some(sheet) = workbook.sheet(&table.sheet_name) else {
                self.observer.on_event(&LoadEvent::SheetMissing {
                    domain: table.domain,
                    sheet: table.sheet_name.clone(),
                });
                continue;
            };

            if sheet.rows.is_empty() {
                self.observer.on_event(&LoadEvent::SheetEmpty {
                    domain: table.domain,
                    sheet: table.sheet_name.clone(),
                });
                continue;
            }

            self.observer.on_event(&LoadEvent::SheetColumns {
                sheet: sheet.name.clone(),
                columns: sheet.columns.clone(),
            });

            let clients = table.normalize(&sheet.rows);
            self.observer.on_event(&LoadEvent::DomainNormalized {
                domain: table.domain,
                rows: sheet.rows.len(),
                clients: clients.len(),
            });
            data.set(table.domain, clients);
        }

        data
    }
}

#[async_trait::async_trait]
impl<Src: WorkbookSource, S: Storage, C: ConfigProvider> Pipeline for CoveragePipeline<Src, S, C> {
    async fn extract(&self) -> Result<Workbook> {
        let bytes = self.source.fetch().await?;
        self.observer.on_event(&LoadEvent::Fetched {
            source: self.source.describe(),
            bytes: bytes.len(),
        });

        let format = self
            .config
            .source_format()
            .resolve(self.config.source_location());
        tracing::debug!("Decoding {} bytes as {:?}", bytes.len(), format);

        let workbook = decode(&bytes, format)?;
        self.observer.on_event(&LoadEvent::Decoded {
            sheets: workbook
                .sheet_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        });

        Ok(workbook)
    }

    async fn transform(&self, workbook: Workbook) -> Result<CoverageData> {
        Ok(self.assemble(&workbook))
    }

    async fn load(&self, data: CoverageData) -> Result<String> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (file_name, bytes) = match format.as_str() {
                "json" => (JSON_OUTPUT, render_json(&data)?),
                "csv" => (CSV_OUTPUT, render_csv(&data)?),
                other => {
                    tracing::warn!("Skipping unsupported output format: {}", other);
                    continue;
                }
            };

            tracing::debug!("Writing {} ({} bytes)", file_name, bytes.len());
            self.storage.write_file(file_name, &bytes).await?;
            written.push(file_name);
        }

        let primary = written.first().copied().unwrap_or(JSON_OUTPUT);
        Ok(format!("{}/{}", self.config.output_path(), primary))
    }
}

/// The `{ data, automation, infrastructure }` document read by the views.
pub fn render_json(data: &CoverageData) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(data)?)
}

/// One line per domain, client, sub-specialty and person.
pub fn render_csv(data: &CoverageData) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "domain",
        "coverage_name",
        "client_sub_type",
        "coverage",
        "specialty",
        "sub_specialty",
        "person",
    ])?;

    for domain in Domain::ALL {
        for client in data.get(domain) {
            for (specialty, group) in client.specialties.iter() {
                for (sub_specialty, people) in group.sub_specialties.iter() {
                    for person in people {
                        writer.write_record([
                            domain.key(),
                            client.coverage_name.as_str(),
                            client.client_sub_type.as_str(),
                            client.coverage.as_str(),
                            specialty,
                            sub_specialty,
                            person.as_str(),
                        ])?;
                    }
                }
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| crate::utils::error::CoverageError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::observer::MemoryObserver;
    use crate::core::workbook::SourceFormat;
    use crate::domain::model::{RowRecord, Sheet};
    use crate::utils::error::CoverageError;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticSource(Vec<u8>);

    impl WorkbookSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    struct MockConfig {
        location: String,
        output_formats: Vec<String>,
    }

    impl MockConfig {
        fn new(output_formats: &[&str]) -> Self {
            Self {
                location: "coverage.csv".to_string(),
                output_formats: output_formats.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source_location(&self) -> &str {
            &self.location
        }

        fn source_format(&self) -> SourceFormat {
            SourceFormat::Auto
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn request_timeout(&self) -> Option<Duration> {
            None
        }

        fn column_tables(&self) -> ColumnTables {
            ColumnTables::builtin()
        }
    }

    fn pipeline(
        bytes: &[u8],
        formats: &[&str],
    ) -> CoveragePipeline<StaticSource, MockStorage, MockConfig> {
        CoveragePipeline::new(
            StaticSource(bytes.to_vec()),
            MockStorage::new(),
            MockConfig::new(formats),
        )
    }

    fn sheet(name: &str, rows: Vec<RowRecord>) -> Sheet {
        Sheet {
            name: name.to_string(),
            columns: vec!["Coverage Name".to_string()],
            rows,
        }
    }

    #[test]
    fn test_assemble_reports_missing_and_empty_sheets() {
        let observer = Arc::new(MemoryObserver::new());
        let pipeline = pipeline(b"", &["json"]).with_observer(observer.clone());

        let workbook = Workbook {
            sheets: vec![
                sheet(
                    "Data",
                    vec![RowRecord::new()
                        .with_cell("Coverage Name", "Acme Corp")
                        .with_cell("Data BTS - SLM", "Jane Doe")],
                ),
                sheet("Infrastructure", vec![]),
            ],
        };

        let data = pipeline.assemble(&workbook);
        assert_eq!(data.data.len(), 1);
        assert!(data.automation.is_empty());
        assert!(data.infrastructure.is_empty());

        let events = observer.events();
        assert!(events.contains(&LoadEvent::SheetMissing {
            domain: Domain::Automation,
            sheet: "Automation".to_string(),
        }));
        assert!(events.contains(&LoadEvent::SheetEmpty {
            domain: Domain::Infrastructure,
            sheet: "Infrastructure".to_string(),
        }));
        assert!(events.contains(&LoadEvent::DomainNormalized {
            domain: Domain::Data,
            rows: 1,
            clients: 1,
        }));
    }

    #[tokio::test]
    async fn test_extract_transform_load_from_legacy_csv() {
        let csv = "Id,Coverage Name,Client Sub Type,Leader,ATL Manager,TSR,ATL,Coverage,SLM\n\
1,Acme Corp,Strategic,,,,,Named,Jane Doe\n";
        let pipeline = pipeline(csv.as_bytes(), &["json", "csv"]);

        let workbook = pipeline.extract().await.unwrap();
        let data = pipeline.transform(workbook).await.unwrap();
        assert_eq!(data.data[0].coverage_name, "Acme Corp");

        let output = pipeline.load(data).await.unwrap();
        assert_eq!(output, "test_output/coverage.json");

        let json = pipeline.storage.get_file(JSON_OUTPUT).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["data"][0]["coverageName"], "Acme Corp");
        assert_eq!(
            value["data"][0]["specialties"]["Data BTS"]["subSpecialties"]["Data BTS - SLM"][0],
            "Jane Doe"
        );
        assert_eq!(value["automation"].as_array().unwrap().len(), 0);

        let csv_out = pipeline.storage.get_file(CSV_OUTPUT).await.unwrap();
        let csv_text = String::from_utf8(csv_out).unwrap();
        assert!(csv_text.starts_with("domain,coverage_name"));
        assert!(csv_text.contains("data,Acme Corp,Strategic,Named,Data BTS,Data BTS - SLM,Jane Doe"));
    }

    #[tokio::test]
    async fn test_undecodable_bytes_fail_extract() {
        let mut pipeline = pipeline(b"not a workbook", &["json"]);
        pipeline.config.location = "coverage.xlsx".to_string();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, CoverageError::Decode(_)));
    }
}
