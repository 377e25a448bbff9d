use crate::core::{CoverageData, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::LoadMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: LoadMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: LoadMonitor::new(monitor_enabled),
        }
    }

    /// Fetch, decode and normalize without writing anything.
    pub async fn load_data(&self) -> Result<CoverageData> {
        tracing::info!("Fetching workbook...");
        let workbook = self.pipeline.extract().await?;
        tracing::info!("Decoded {} sheet(s)", workbook.sheets.len());
        self.monitor.log_phase("extract");

        let data = self.pipeline.transform(workbook).await?;
        tracing::info!(
            data = data.data.len(),
            automation = data.automation.len(),
            infrastructure = data.infrastructure.len(),
            "Normalized {} client(s)",
            data.total_clients()
        );
        self.monitor.log_phase("transform");

        Ok(data)
    }

    pub async fn run(&self) -> Result<String> {
        let data = self.load_data().await?;

        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(data).await?;
        self.monitor.log_phase("load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
