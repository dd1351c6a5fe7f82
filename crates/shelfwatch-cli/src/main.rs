mod sample;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfwatch-cli")]
#[command(about = "Discontinued-product discovery and alternative recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl merchant sitemaps, find discontinued/out-of-stock products, and
    /// publish ranked alternatives.
    Discover,
    /// Re-rank alternatives for everything currently not in stock.
    Refresh,
    /// Post one hard-coded recommendation item to verify endpoint wiring.
    PostSample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = shelfwatch_core::load_app_config_from_env()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Discover => {
            let merchants = shelfwatch_core::load_merchants(&config.merchants_path)?;
            let summary = shelfwatch_scraper::pipeline::run_discover(&config, &merchants.sitemaps)
                .await
                .map_err(|e| anyhow::anyhow!("discover run failed: {e}"))?;
            tracing::info!(
                urls = summary.urls_discovered,
                pages = summary.pages_fetched,
                items = summary.items_built,
                chunks = summary.receipts.len(),
                "discover run complete"
            );
        }
        Commands::Refresh => {
            let merchants = shelfwatch_core::load_merchants(&config.merchants_path)?;
            let summary = shelfwatch_scraper::pipeline::run_refresh(&config, &merchants.sitemaps)
                .await
                .map_err(|e| anyhow::anyhow!("refresh run failed: {e}"))?;
            tracing::info!(
                urls = summary.urls_discovered,
                pages = summary.pages_fetched,
                items = summary.items_built,
                chunks = summary.receipts.len(),
                "refresh run complete"
            );
        }
        Commands::PostSample => {
            let publisher = shelfwatch_scraper::Publisher::new(
                &config.ingest_endpoint,
                &config.ingest_secret,
                config.publish_chunk_size,
                config.request_timeout_secs,
            )
            .map_err(|e| anyhow::anyhow!("failed to build publisher: {e}"))?;
            tracing::info!(endpoint = %config.ingest_endpoint, "posting one sample item");
            let receipts = publisher.publish(&[sample::sample_item()]).await;
            for receipt in receipts {
                println!("POST {} -> {}: {}", receipt.offset, receipt.status, receipt.body);
            }
        }
    }

    Ok(())
}
