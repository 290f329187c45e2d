mod cli;
mod logging;
mod settings;

use std::fs;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_error, engine_info, engine_warn};
use log::LevelFilter;
use mdl_core::parse_seed_list;
use mdl_engine::{Dispatcher, EngineConfig};

use crate::cli::Cli;
use crate::logging::LogDestination;
use crate::settings::FileConfig;

fn main() {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(destination, level);

    if let Err(err) = run(&cli) {
        engine_error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = settings::resolve(cli, file);

    let raw = fs::read_to_string(&cli.urls_file)
        .with_context(|| format!("failed to read URL list {}", cli.urls_file.display()))?;
    let seeds = parse_seed_list(&raw);
    if seeds.is_empty() {
        engine_warn!("No URLs in {}", cli.urls_file.display());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(download_all(&config, &seeds))
}

async fn download_all(config: &EngineConfig, seeds: &[String]) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config).context("invalid configuration")?;
    let queued = dispatcher.frontier().seed(seeds);
    engine_info!(
        "Queued {} URLs; saving to {}",
        queued,
        config.output_dir.display()
    );
    if let Some(prefix) = &config.crawl_prefix {
        engine_info!("Crawling links under {}", prefix);
    }

    let summary = dispatcher.run().await;
    engine_info!("All workers completed. {}", summary);
    Ok(())
}
