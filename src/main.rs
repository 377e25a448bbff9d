use clap::Parser;
use coverage_etl::core::ConfigProvider;
use coverage_etl::utils::error::{CoverageError, ErrorSeverity};
use coverage_etl::utils::{logger, validation::Validate};
use coverage_etl::{CliConfig, CoveragePipeline, EtlEngine, LocalStorage, Source};
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting coverage-etl");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let span = logger::load_span("cli", &config.source);
    let source = Source::from_location(&config.source, config.request_timeout());
    let storage = LocalStorage::new(config.output_path.clone());
    let monitor_enabled = config.monitor;
    let pipeline = CoveragePipeline::new(source, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().instrument(span).await {
        Ok(output_path) => {
            tracing::info!("Output saved to: {}", output_path);
            println!("✅ Coverage data written to {}", output_path);
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn report_failure(e: &CoverageError) {
    tracing::error!(
        "Load failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn exit_code(e: &CoverageError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
