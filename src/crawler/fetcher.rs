//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Redirect handling (following within the site, refusing to leave it)
//! - Error classification
//!
//! The crawler only depends on the [`PageFetcher`] trait, so tests and other
//! transports can stand in for the reqwest implementation.

use crate::config::Config;
use crate::url::Host;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not HTML (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("{url} redirected off-site to {location}")]
    OffSiteRedirect { url: String, location: String },
}

/// Fetch collaborator used by the crawler
///
/// Implementations return the raw page body; any error means the page is
/// unreachable and contributes no links.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.crawler.request_timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a page body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with HTML or no Content-Type | body bytes |
    /// | Non-2xx status | `Status` |
    /// | Non-HTML Content-Type | `NotHtml` |
    /// | Redirect ending on another site | `OffSiteRedirect` |
    /// | Timeout | `Timeout` |
    /// | Connection/TLS/redirect-limit errors | `Network` |
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let final_url = response.url();
        if final_url != url && !redirect_stays_on_site(url, final_url) {
            return Err(FetchError::OffSiteRedirect {
                url: url.to_string(),
                location: final_url.to_string(),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html_content_type(content_type) {
                return Err(FetchError::NotHtml {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(body.to_vec())
    }
}

/// Maps a reqwest error onto the fetch error kinds
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

fn redirect_stays_on_site(requested: &Url, landed: &Url) -> bool {
    match Host::from_url(requested) {
        Ok(host) => host.contains(landed),
        Err(_) => false,
    }
}

/// Returns true for HTML and XHTML media types
fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type == "text/html" || media_type == "application/xhtml+xml"
}
