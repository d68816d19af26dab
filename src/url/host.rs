use crate::url::normalize::strip_www;
use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Canonical identity of a site: scheme, host without `www.`, and any
/// non-default port, always ending in `/`
///
/// Two URLs belong to the same site iff their derived hosts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    base: Url,
}

impl Host {
    /// Derives the host identity of an already-parsed URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        let hostname = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingHost)?
            .to_lowercase();
        let hostname = strip_www(&hostname);

        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}/", url.scheme(), hostname, port),
            None => format!("{}://{}/", url.scheme(), hostname),
        };

        let base = Url::parse(&origin).map_err(|e| UrlError::Malformed(e.to_string()))?;
        Ok(Self { base })
    }

    /// The host as a string, e.g. `https://example.com/`
    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    /// The host root as a URL, used as the base for relative links
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns true if `url` belongs to this host
    pub fn contains(&self, url: &Url) -> bool {
        Host::from_url(url).map(|h| h == *self).unwrap_or(false)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the host identity from a URL string
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::derive_host;
///
/// let host = derive_host("https://www.Example.com/about?x=1").unwrap();
/// assert_eq!(host.as_str(), "https://example.com/");
///
/// let host = derive_host("http://127.0.0.1:3030/").unwrap();
/// assert_eq!(host.as_str(), "http://127.0.0.1:3030/");
/// ```
pub fn derive_host(url: &str) -> UrlResult<Host> {
    let parsed = Url::parse(url.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    Host::from_url(&parsed)
}

/// Returns true iff `url` derives to the same host as `host`
///
/// Unparsable URLs are never in scope.
pub fn in_scope(url: &str, host: &Host) -> bool {
    derive_host(url).map(|h| h == *host).unwrap_or(false)
}
