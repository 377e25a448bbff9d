use anyhow::Context;
use clap::Parser;
use coverage_etl::config::toml_config::TomlConfig;
use coverage_etl::core::ConfigProvider;
use coverage_etl::utils::{logger, validation::Validate};
use coverage_etl::{
    CoveragePipeline, CoverageStore, Domain, EtlEngine, LoadState, LocalStorage, Source,
};
use tracing::Instrument;

#[derive(Parser)]
#[command(name = "toml-coverage")]
#[command(about = "Coverage loader driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "coverage.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Load and normalize, report counts, write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    config
        .validate()
        .with_context(|| format!("invalid configuration in '{}'", args.config))?;

    tracing::info!(
        "Pipeline '{}' reading {}",
        config.pipeline_name(),
        config.source_location()
    );

    let span = logger::load_span(config.pipeline_name(), config.source_location());
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let source = Source::from_location(config.source_location(), config.request_timeout());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CoveragePipeline::new(source, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    if args.dry_run {
        tracing::info!("DRY RUN - nothing will be written");
        let store = CoverageStore::new();
        store.refresh(&engine).instrument(span).await;

        match store.snapshot().await {
            LoadState::Loaded { data, loaded_at } => {
                println!("Loaded at {}", loaded_at.to_rfc3339());
                for domain in Domain::ALL {
                    println!("  {:<15} {} client(s)", domain.key(), data.get(domain).len());
                }
            }
            LoadState::Failed { message } => anyhow::bail!("Error Loading Data: {}", message),
            LoadState::Idle | LoadState::Loading => anyhow::bail!("load did not complete"),
        }
        return Ok(());
    }

    let output_path = engine.run().instrument(span).await?;
    println!("✅ Coverage data written to {}", output_path);
    Ok(())
}
