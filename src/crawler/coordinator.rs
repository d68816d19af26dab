//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop. A single coordinator
//! task owns the frontier, admits URLs into the visited set and dispatches
//! fetches to a bounded pool of tasks. Workers only fetch and parse; every
//! decision about what to crawl next is made here.

use crate::config::Config;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::output::{CrawlReport, FailureKind, PageFailure};
use crate::state::{Admission, VisitedSet};
use crate::url::{admit_link, derive_host, normalize_url_with, Host, NormalizeOptions};
use crate::SitemapError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How often (in completed pages) progress is logged
const PROGRESS_INTERVAL: usize = 10;

/// What happened to one dispatched page
struct PageResult {
    page: QueuedUrl,
    outcome: Result<ParsedPage, SitemapError>,
}

/// Running totals kept by the coordinator while a crawl is in progress
#[derive(Default)]
struct Progress {
    failures: Vec<PageFailure>,
    pages_done: usize,
    pages_fetched: usize,
    links_seen: usize,
    max_depth: u32,
    limit_reached: bool,
}

/// Breadth-first, host-scoped crawler
///
/// The crawl scope is fixed when the crawler is built and stored here, so
/// independent crawlers never share state. Each call to [`Crawler::run`]
/// starts from an empty visited set.
pub struct Crawler {
    host: Host,
    seed: url::Url,
    options: NormalizeOptions,
    max_pages: Option<usize>,
    crawl_timeout: Option<Duration>,
    fetcher: Arc<dyn PageFetcher>,
    semaphore: Arc<Semaphore>,
}

impl Crawler {
    /// Creates a crawler for the configured seed using the given fetcher
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(SitemapError::Url)` - The seed is not a crawlable URL
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self, SitemapError> {
        let options = config.url.normalize_options();
        let host = derive_host(&config.crawler.seed)?;
        let seed = normalize_url_with(&config.crawler.seed, &options)?;
        let permits = config.crawler.max_concurrent_fetches.max(1) as usize;

        Ok(Self {
            host,
            seed,
            options,
            max_pages: config.crawler.max_pages,
            crawl_timeout: config.crawler.crawl_timeout_secs.map(Duration::from_secs),
            fetcher,
            semaphore: Arc::new(Semaphore::new(permits)),
        })
    }

    /// Creates a crawler that fetches over HTTP
    pub fn from_config(config: &Config) -> Result<Self, SitemapError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Self::new(config, Arc::new(fetcher))
    }

    /// The host every crawled URL must belong to
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Runs the crawl until the frontier drains or `cancel` fires
    ///
    /// Per-page fetch and parse errors are recorded in the report and never
    /// abort the crawl. On cancellation (explicit or via the configured crawl
    /// timeout) in-flight fetches are aborted, the frontier is discarded, and
    /// the report holds everything visited so far.
    pub async fn run(&self, cancel: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {} from {}", self.host, self.seed);

        let visited = VisitedSet::new();
        let mut frontier = Frontier::new();
        frontier.enqueue(QueuedUrl::seed(self.seed.clone()), &visited);

        let mut tasks: JoinSet<PageResult> = JoinSet::new();
        let mut progress = Progress::default();
        let mut cancelled = false;

        let deadline = async {
            match self.crawl_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        loop {
            self.dispatch(&visited, &mut frontier, &mut tasks, &mut progress);

            if tasks.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::warn!("Crawl cancelled, keeping {} visited pages", visited.len());
                    cancelled = true;
                    break;
                }

                _ = &mut deadline => {
                    tracing::warn!(
                        "Crawl timeout of {:?} reached, keeping {} visited pages",
                        self.crawl_timeout.unwrap_or_default(),
                        visited.len()
                    );
                    cancelled = true;
                    break;
                }

                Some(joined) = tasks.join_next() => match joined {
                    Ok(result) => self.absorb(result, &visited, &mut frontier, &mut progress),
                    Err(e) => {
                        progress.pages_done += 1;
                        tracing::error!("Fetch task ended abnormally: {}", e);
                    }
                },
            }

            if progress.pages_done > 0 && progress.pages_done % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages done, {} in frontier, {} in flight",
                    progress.pages_done,
                    frontier.len(),
                    tasks.len()
                );
            }
        }

        if cancelled {
            tasks.abort_all();
            frontier.clear();
        }

        let report = CrawlReport {
            host: self.host.clone(),
            seed: self.seed.clone(),
            visited: visited.snapshot(),
            failures: progress.failures,
            pages_fetched: progress.pages_fetched,
            links_seen: progress.links_seen,
            max_depth: progress.max_depth,
            cancelled,
            limit_reached: progress.limit_reached,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished: {} pages visited, {} failed, in {:?}",
            report.visited.len(),
            report.failures.len(),
            report.duration()
        );

        report
    }

    /// Admits queued URLs and spawns fetches while permits are available
    ///
    /// Admission into the visited set happens here, before the fetch is
    /// dispatched, so a URL is marked visited before any of its links are
    /// considered.
    fn dispatch(
        &self,
        visited: &VisitedSet,
        frontier: &mut Frontier,
        tasks: &mut JoinSet<PageResult>,
        progress: &mut Progress,
    ) {
        while let Ok(permit) = self.semaphore.clone().try_acquire_owned() {
            let Some(queued) = frontier.pop() else {
                break;
            };

            match visited.admit(queued.url.as_str(), self.max_pages) {
                Admission::Admitted => {}
                Admission::AlreadyVisited => {
                    tracing::trace!("Skipping already visited {}", queued.url);
                    continue;
                }
                Admission::LimitReached => {
                    if !progress.limit_reached {
                        tracing::info!(
                            "Page limit of {} reached, no further pages will be admitted",
                            self.max_pages.unwrap_or_default()
                        );
                    }
                    progress.limit_reached = true;
                    frontier.clear();
                    break;
                }
            }

            progress.max_depth = progress.max_depth.max(queued.depth);
            tracing::debug!("Processing URL: {} (depth {})", queued.url, queued.depth);

            let fetcher = Arc::clone(&self.fetcher);
            tasks.spawn(async move {
                let _permit = permit;
                process_page(fetcher, queued).await
            });
        }
    }

    /// Folds one page result into the crawl state
    fn absorb(
        &self,
        result: PageResult,
        visited: &VisitedSet,
        frontier: &mut Frontier,
        progress: &mut Progress,
    ) {
        let PageResult { page, outcome } = result;
        progress.pages_done += 1;

        let parsed = match outcome {
            Ok(parsed) => parsed,
            Err(e) => {
                let kind = FailureKind::of(&e);
                tracing::warn!("Failed to {} {}: {}", kind, page.url, e);
                progress.failures.push(PageFailure {
                    url: page.url.to_string(),
                    kind,
                    message: e.to_string(),
                });
                return;
            }
        };

        progress.pages_fetched += 1;
        progress.links_seen += parsed.links.len();
        tracing::debug!(
            "Parsed {} ({:?}): {} links",
            page.url,
            parsed.title.as_deref().unwrap_or(""),
            parsed.links.len()
        );

        if progress.limit_reached {
            return;
        }

        for raw in &parsed.links {
            match admit_link(raw, &self.host, &self.options) {
                Ok(Some(url)) => {
                    let next = QueuedUrl {
                        url,
                        depth: page.depth + 1,
                    };
                    if frontier.enqueue(next, visited) {
                        tracing::trace!("Queued {} from {}", raw, page.url);
                    }
                }
                Ok(None) => tracing::trace!("Out of scope: {}", raw),
                Err(e) => tracing::debug!("Dropping link {:?} on {}: {}", raw, page.url, e),
            }
        }
    }
}

/// Fetches and parses one page; runs on a pool task
async fn process_page(fetcher: Arc<dyn PageFetcher>, page: QueuedUrl) -> PageResult {
    let outcome = fetch_and_parse(fetcher.as_ref(), &page.url).await;
    PageResult { page, outcome }
}

async fn fetch_and_parse(
    fetcher: &dyn PageFetcher,
    url: &url::Url,
) -> Result<ParsedPage, SitemapError> {
    let body = fetcher.fetch(url).await?;
    Ok(parse_page(&body)?)
}
