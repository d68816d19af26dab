//! Output module for sitemap generation and crawl reports
//!
//! This module handles:
//! - Serializing the visited set as a sitemap document
//! - Writing the sitemap file atomically
//! - Printing crawl statistics

mod sitemap;
pub mod stats;
mod traits;
mod writer;

pub use sitemap::{render, SITEMAP_NAMESPACE};
pub use stats::{print_report, CrawlStatistics};
pub use traits::{
    CrawlReport, FailureKind, OutputError, OutputHandler, OutputResult, PageFailure,
};
pub use writer::{write_atomic, SitemapFileOutput};
