//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` seam
//! - HTML parsing and link extraction
//! - The FIFO frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{extract_links, parse_document, parse_page, ParseError, ParsedPage};

pub use crate::output::CrawlReport;

use crate::config::Config;
use crate::SitemapError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Derive the crawl scope from the seed
/// 2. Build the HTTP client
/// 3. Fetch pages breadth-first, following same-site links
/// 4. Stop when the frontier drains or `cancel` fires
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished or was cancelled; the report is usable either way
/// * `Err(SitemapError)` - The crawl could not be started
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&Config::default(), CancellationToken::new()).await?;
/// println!("{} pages", report.visited.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, cancel: CancellationToken) -> Result<CrawlReport, SitemapError> {
    let crawler = Crawler::from_config(config)?;
    Ok(crawler.run(cancel).await)
}
