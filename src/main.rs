//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap crawler.

use clap::Parser;
use std::path::PathBuf;
use sumi_sitemap::config::{load_config_with_hash, validate, Config};
use sumi_sitemap::crawler::crawl;
use sumi_sitemap::output::{print_report, OutputHandler, SitemapFileOutput};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a same-host sitemap generator
///
/// Sumi-Sitemap crawls every page reachable from a seed URL without leaving
/// the seed's host and writes the result as a sitemap XML file.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version = "1.0.0")]
#[command(about = "A same-host sitemap generator", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed URL to start crawling from
    #[arg(short, long, value_name = "SEED")]
    url: Option<String>,

    /// Where to write the sitemap
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum number of concurrent fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Stop admitting pages after this many
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Cancel the crawl after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Treat URLs that differ only in query string as the same page
    #[arg(long)]
    drop_query: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.url {
        config.crawler.seed = seed.clone();
    }
    if let Some(output) = &cli.output {
        config.output.sitemap_path = output.display().to_string();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.crawl_timeout_secs = Some(timeout);
    }
    if cli.drop_query {
        config.url.keep_query = false;
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} with up to {} concurrent fetches",
        config.crawler.seed,
        config.crawler.max_concurrent_fetches
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; finishing with the pages visited so far");
            on_interrupt.cancel();
        }
    });

    let report = match crawl(&config, cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !quiet {
        print_report(&report);
    }

    let output = SitemapFileOutput::new(&config.output.sitemap_path);
    if let Err(e) = output.write_report(&report) {
        tracing::error!("Failed to write sitemap: {}", e);
        return Err(sumi_sitemap::SitemapError::from(e).into());
    }

    if !quiet {
        println!("\n✓ Sitemap written to: {}", output.path().display());
    }

    Ok(())
}
