// Command-line entry point for the renewables harvester.

use anyhow::{bail, Result};
use clap::Parser;
use harvester::driver::{self, HarvestConfig};
use harvester::fetch::{Fetcher, HttpFetchClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract the trailing week of renewables data and persist one artifact
/// per family.
#[derive(Parser, Debug)]
#[command(name = "harvest", version, about)]
struct Args {
    /// API key used to extract the data from the data source
    #[arg(long)]
    api_key: String,

    /// Base URL of the data API
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Directory artifacts are written into
    #[arg(long, default_value = "./output")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Fixed window: today and the six preceding calendar days.
    let config = HarvestConfig::new(args.api_key).with_output_dir(args.output_dir);
    let sources = driver::default_sources(&args.base_url);
    let fetcher = Fetcher::new(HttpFetchClient::new());

    let summary = driver::run(&config, &sources, &fetcher).await?;
    if !summary.is_success() {
        let families: Vec<&str> = summary.failed.iter().map(|(family, _)| *family).collect();
        bail!("harvest failed for: {}", families.join(", "));
    }

    tracing::info!(
        families = summary.succeeded.len(),
        "all family pipelines succeeded"
    );
    Ok(())
}
