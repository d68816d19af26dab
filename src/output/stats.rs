//! Statistics derived from a crawl report
//!
//! This module condenses a `CrawlReport` into the numbers printed at the
//! end of a run.

use crate::output::traits::{CrawlReport, FailureKind};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages admitted to the crawl (and to the sitemap)
    pub pages_visited: usize,

    /// Pages fetched and parsed successfully
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub fetch_failures: usize,

    /// Pages whose body could not be parsed
    pub parse_failures: usize,

    /// Raw links seen across all parsed pages
    pub links_seen: usize,

    /// Deepest link distance reached
    pub max_depth: u32,

    /// Wall-clock duration in seconds
    pub duration_secs: f64,

    pub cancelled: bool,
    pub limit_reached: bool,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            pages_visited: report.visited.len(),
            pages_fetched: report.pages_fetched,
            fetch_failures: report.failures_of(FailureKind::Fetch),
            parse_failures: report.failures_of(FailureKind::Parse),
            links_seen: report.links_seen,
            max_depth: report.max_depth,
            duration_secs: report.duration().as_secs_f64(),
            cancelled: report.cancelled,
            limit_reached: report.limit_reached,
        }
    }

    /// Percentage of visited pages that were fetched and parsed
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / self.pages_visited as f64) * 100.0
        }
    }
}

/// Prints a report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    let stats = CrawlStatistics::from_report(report);

    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Host: {}", report.host);
    println!("  Seed: {}", report.seed);
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Links seen: {}", stats.links_seen);
    println!("  Max depth: {}", stats.max_depth);
    println!("  Duration: {:.2}s", stats.duration_secs);
    println!();

    if !report.failures.is_empty() {
        println!("Failures:");
        println!("  fetch: {}", stats.fetch_failures);
        println!("  parse: {}", stats.parse_failures);
        for failure in &report.failures {
            println!("  - [{}] {}: {}", failure.kind, failure.url, failure.message);
        }
        println!();
    }

    if stats.cancelled {
        println!("Crawl was cancelled; the sitemap is partial.");
    } else if stats.limit_reached {
        println!("Page limit reached; the sitemap is partial.");
    }

    println!("Success rate: {:.1}%", stats.success_rate());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::traits::PageFailure;
    use crate::url::derive_host;
    use chrono::{Duration, Utc};
    use url::Url;

    fn sample_report() -> CrawlReport {
        let started_at = Utc::now();
        CrawlReport {
            host: derive_host("https://example.com/").unwrap(),
            seed: Url::parse("https://example.com/").unwrap(),
            visited: [
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            failures: vec![
                PageFailure {
                    url: "https://example.com/b".to_string(),
                    kind: FailureKind::Fetch,
                    message: "status 404".to_string(),
                },
                PageFailure {
                    url: "https://example.com/c".to_string(),
                    kind: FailureKind::Parse,
                    message: "invalid UTF-8".to_string(),
                },
            ],
            pages_fetched: 2,
            links_seen: 9,
            max_depth: 1,
            cancelled: false,
            limit_reached: false,
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
        }
    }

    #[test]
    fn test_from_report() {
        let stats = CrawlStatistics::from_report(&sample_report());

        assert_eq!(stats.pages_visited, 4);
        assert_eq!(stats.pages_fetched, 2);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.links_seen, 9);
        assert_eq!(stats.max_depth, 1);
        assert!((stats.duration_secs - 1.5).abs() < 1e-9);
        assert!(!stats.cancelled);
    }

    #[test]
    fn test_success_rate() {
        let stats = CrawlStatistics::from_report(&sample_report());
        assert!((stats.success_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_success_rate_empty() {
        let mut report = sample_report();
        report.visited.clear();
        report.pages_fetched = 0;
        assert_eq!(CrawlStatistics::from_report(&report).success_rate(), 0.0);
    }
}
