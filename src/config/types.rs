use crate::url::NormalizeOptions;
use serde::Deserialize;

/// Seed used when neither the config file nor the command line names one
pub const DEFAULT_SEED: &str = "http://localhost:3030/";

/// Main configuration structure for Sumi-Sitemap
///
/// Every section is optional in the TOML file; missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub url: UrlConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host is the crawl scope
    pub seed: String,

    /// Maximum number of page fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Whole-crawl timeout (seconds); the crawl is cancelled when it expires
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: Option<u64>,

    /// Maximum number of pages admitted to the sitemap
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            max_concurrent_fetches: 4,
            request_timeout_secs: 30,
            crawl_timeout_secs: None,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSitemap".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`, with the
    /// parenthesised part omitted when no contact details are configured.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = self
            .contact_url
            .iter()
            .map(|url| format!("+{}", url))
            .chain(self.contact_email.iter().cloned())
            .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// URL canonicalization configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Whether query strings distinguish pages
    #[serde(rename = "keep-query")]
    pub keep_query: bool,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self { keep_query: true }
    }
}

impl UrlConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            keep_query: self.keep_query,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path the sitemap XML is written to
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: "sitemap.xml".to_string(),
        }
    }
}
