//! `bandscan` CLI - build the station catalog, then serve lookups over it

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use bandscan::source::directory::DEFAULT_API_URL;
use bandscan::source::listing::DEFAULT_LISTING_URL;
use bandscan::{Aggregator, CatalogClient};

#[derive(Parser)]
#[command(name = "bandscan")]
#[command(about = "Internet radio station catalog builder and lookup service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every source into the catalog file
    Aggregate {
        /// Catalog output path
        #[arg(short, long, default_value = "radio_stations.json")]
        out: PathBuf,

        /// HTML listing page to scrape
        #[arg(long, default_value = DEFAULT_LISTING_URL)]
        listing_url: String,

        /// Directory API search endpoint
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Serve the lookup API over a previously built catalog
    Serve {
        /// Catalog file to load at startup
        #[arg(short, long, default_value = "radio_stations.json")]
        catalog: PathBuf,

        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            out,
            listing_url,
            api_url,
        } => {
            cmd_aggregate(&out, &listing_url, &api_url).await?;
        }
        Commands::Serve { catalog, addr } => {
            bandscan::serve::serve(&catalog, addr).await?;
        }
    }

    Ok(())
}

async fn cmd_aggregate(out: &std::path::Path, listing_url: &str, api_url: &str) -> Result<()> {
    let client = CatalogClient::new()?;
    let aggregator = Aggregator::with_default_sources(listing_url, api_url)?;

    let stations = aggregator.run(&client).await;
    bandscan::catalog::write(out, &stations)?;

    let playable = stations.iter().filter(|s| s.playable).count();
    println!(
        "📻 {} stations ({playable} playable) written to {}",
        stations.len(),
        out.display()
    );

    Ok(())
}
