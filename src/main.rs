// imagegrabber CLI
//
// Extracts the deduplicated image list of one page and prints it as JSON.
// Logging goes to stderr and is controlled by RUST_LOG.

use anyhow::{Context, Result};
use clap::Parser;
use imagegrabber::{DedupStrategy, GrabConfig, ImageExtractor};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "imagegrabber", version, about = "Find every image on a web page")]
struct Cli {
    /// Absolute http(s) URL of the page to scan
    url: String,

    /// Skip HEAD/GET metadata resolution
    #[arg(long)]
    no_metadata: bool,

    /// Variant selection: `first` or `prefer-resolved`
    #[arg(long, default_value_t = DedupStrategy::PreferResolved)]
    strategy: DedupStrategy,

    /// Images resolved concurrently
    #[arg(long, default_value_t = imagegrabber::utils::DEFAULT_MAX_CONCURRENT_RESOLUTIONS)]
    concurrency: usize,

    /// Concurrent metadata requests per image host
    #[arg(long, default_value_t = imagegrabber::utils::DEFAULT_MAX_CONCURRENT_PER_HOST)]
    per_host: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = GrabConfig::builder()
        .resolve_metadata(!cli.no_metadata)
        .dedup_strategy(cli.strategy)
        .max_concurrent_resolutions(cli.concurrency)
        .max_concurrent_per_host(cli.per_host)
        .request_timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Invalid configuration")?;

    let extractor = ImageExtractor::new(config)?;
    let images = extractor
        .extract(&cli.url)
        .await
        .with_context(|| format!("Failed to extract images from {}", cli.url))?;

    log::info!("Found {} images on {}", images.len(), cli.url);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&images)?
    } else {
        serde_json::to_string(&images)?
    };
    println!("{json}");

    Ok(())
}
