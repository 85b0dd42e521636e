//! `linkcard` CLI - scrape one URL into a link preview record

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkcard::{Config, NormalizedRecord, Scraper};

#[derive(Parser)]
#[command(name = "linkcard")]
#[command(about = "Scrape a URL into a normalized link preview")]
#[command(version)]
struct Cli {
    /// URL to scrape
    url: String,

    /// Print the record as pretty JSON
    #[arg(short, long)]
    json: bool,

    /// Config file (default: ~/.config/linkcard/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print which extractor owns the URL
    #[arg(short, long)]
    which: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linkcard=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let scraper = Scraper::from_config(&config)?;

    if cli.which {
        match scraper.extractor_for(&cli.url) {
            Some(extractor) => println!("{}", extractor.name()),
            None => anyhow::bail!("no extractor wants {}", cli.url),
        }
        return Ok(());
    }

    let record = scraper
        .scrape(&cli.url)
        .await
        .with_context(|| format!("failed to scrape {}", cli.url))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_summary(&record);
    }

    Ok(())
}

fn print_summary(record: &NormalizedRecord) {
    println!("{}", record.title);
    println!("   Source: {} ({})", record.source_type(), record.source_key);
    if !record.credit_title.is_empty() {
        println!("   Credit: {} <{}>", record.credit_title, record.credit_url);
    }
    for thumbnail in &record.thumbnail_sources {
        println!("   Thumbnail: {thumbnail}");
    }
    if !record.description.is_empty() {
        println!("\n{}", record.description);
    }
}
