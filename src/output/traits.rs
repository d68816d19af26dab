//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! report a finished (or cancelled) crawl hands to them.

use crate::url::Host;
use crate::SitemapError;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Which collaborator failed for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Fetch,
    Parse,
}

impl FailureKind {
    /// Classifies a per-page crawl error
    pub fn of(error: &SitemapError) -> Self {
        match error {
            SitemapError::Parse(_) => Self::Parse,
            _ => Self::Fetch,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// A visited page that contributed no links
#[derive(Debug, Clone)]
pub struct PageFailure {
    /// The URL that failed
    pub url: String,

    /// Which step failed
    pub kind: FailureKind,

    /// Error message
    pub message: String,
}

/// Everything a crawl run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Scope of the run
    pub host: Host,

    /// Canonical seed URL
    pub seed: Url,

    /// Every URL admitted to the crawl, sorted
    pub visited: BTreeSet<String>,

    /// Pages that were visited but could not be fetched or parsed
    pub failures: Vec<PageFailure>,

    /// Pages fetched and parsed successfully
    pub pages_fetched: usize,

    /// Raw links seen across all parsed pages
    pub links_seen: usize,

    /// Deepest link distance reached from the seed
    pub max_depth: u32,

    /// True if the run was cancelled before the frontier drained
    pub cancelled: bool,

    /// True if the page limit stopped further admissions
    pub limit_reached: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// True if every reachable page was visited
    pub fn is_complete(&self) -> bool {
        !self.cancelled && !self.limit_reached
    }

    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}

/// Trait for sinks that persist a crawl report
pub trait OutputHandler {
    /// Persists the report; any error is fatal for the run
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()>;
}
