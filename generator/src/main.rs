//! Main entry point for the generator binary

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;

use generator::{
    services::{CollectingSink, JsonCatalogLoader, JsonIdentitySource, ManifestSink},
    BatchReport, BatchRunner, CatalogLoader, GeneratorConfig, IdentitySource, RenderSink,
};
use shared::logging;

/// Generate unique trait combinations for a batch of items
#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Resolves one unique trait combination per item from an option catalog")]
pub struct Args {
    /// Option catalog (JSON)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Token metadata providing rarity, species and seed per item (JSON)
    #[arg(long)]
    pub identities: PathBuf,

    /// Output directory for manifests, metadata and the usage table
    #[arg(long, default_value = "./output")]
    pub output: PathBuf,

    /// Number of items to generate, starting at index 1
    #[arg(long)]
    pub items: Option<u32>,

    /// Generate only this item index
    #[arg(long, conflicts_with = "items")]
    pub single: Option<u32>,

    /// Generator configuration (JSON); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of parallel item workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Resolution attempts per item
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Resolve without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

async fn load_config(args: &Args) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(attempts) = args.max_attempts {
        config = config.with_max_attempts(attempts);
    }
    Ok(config)
}

async fn execute<I, S>(runner: BatchRunner<I, S>, args: &Args) -> anyhow::Result<BatchReport>
where
    I: IdentitySource + 'static,
    S: RenderSink + 'static,
{
    let finalize = runner.finalize_flag();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("🛑 Ctrl-C received, finishing in-flight items");
            finalize.raise();
        }
    });

    let report = match (args.single, args.items) {
        (Some(index), _) => runner.run_single(index).await?,
        (None, Some(count)) => runner.run(count).await?,
        (None, None) => runner.run(u32::MAX).await?,
    };
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup("generator");

    let config = load_config(&args).await?;
    config.validate()?;

    let catalog = JsonCatalogLoader::new(&args.catalog)
        .load()
        .await
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    let identities = JsonIdentitySource::open(&args.identities)
        .await
        .with_context(|| format!("loading identities {}", args.identities.display()))?;
    logging::log_progress(
        "Inputs ready",
        &format!("{} options, {} identity records", catalog.option_count(), identities.len()),
    );

    let result = if args.dry_run {
        let runner = BatchRunner::new(catalog, identities, CollectingSink::new(), config)?;
        execute(runner, &args).await
    } else {
        let runner = BatchRunner::new(catalog, identities, ManifestSink::new(&args.output), config)?;
        execute(runner, &args).await
    };

    match result {
        Ok(report) => {
            for (index, reason) in &report.exhausted {
                tracing::info!(item = *index, "⏭️ Skipped: {}", reason);
            }
            logging::log_success(&format!(
                "{} of {} items generated",
                report.accepted.len(),
                report.total()
            ));
            Ok(())
        }
        Err(error) => {
            logging::log_error("Generation", &error);
            Err(error)
        }
    }
}
