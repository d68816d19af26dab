use crate::url::Host;
use crate::{UrlError, UrlResult};
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Options controlling how URLs are canonicalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Treat query strings as part of page identity.
    ///
    /// When false the query is dropped and `/list?page=2` is the same page
    /// as `/list`.
    pub keep_query: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { keep_query: true }
    }
}

/// Normalizes a URL according to Sumi-Sitemap's normalization rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only http:// and https://
/// 3. Lowercase the host
/// 4. Remove leading www. labels from the host
/// 5. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse repeated slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 6. Remove fragment (everything after #)
/// 7. Remove tracking query parameters
/// 8. Sort remaining query parameters alphabetically
/// 9. Remove empty query string (trailing ?)
///
/// Applying it twice yields the same URL as applying it once.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::normalize_url;
///
/// let url = normalize_url("http://WWW.EXAMPLE.COM/page/").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    normalize_url_with(url_str, &NormalizeOptions::default())
}

/// Normalizes a URL string with explicit options
pub fn normalize_url_with(url_str: &str, options: &NormalizeOptions) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url, options)
}

/// Canonicalizes an already-parsed URL
///
/// This is the single place where page identity is decided; every URL that
/// reaches the visited set has passed through here.
pub fn canonicalize(mut url: Url, options: &NormalizeOptions) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlError::MissingHost)?;
    let normalized_host = strip_www(&host.to_lowercase()).to_string();
    if normalized_host != host {
        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let query = if options.keep_query {
            filter_and_sort_query_params(&url).join("&")
        } else {
            String::new()
        };

        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Resolves a raw link target to an absolute URL
///
/// A candidate that already carries a scheme is returned unchanged. Anything
/// else is taken relative to the host root: leading slashes are removed and
/// the remainder is appended to the host (which always ends in `/`), so the
/// two compose without a doubled or missing separator. Scheme-relative links
/// (`//cdn.example.com/x`) inherit the host's scheme.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::{derive_host, resolve_absolute};
///
/// let host = derive_host("https://www.example.com/start").unwrap();
/// let url = resolve_absolute("/about", &host).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
///
/// let url = resolve_absolute("https://other.com/", &host).unwrap();
/// assert_eq!(url.as_str(), "https://other.com/");
/// ```
pub fn resolve_absolute(candidate: &str, host: &Host) -> UrlResult<Url> {
    let candidate = candidate.trim();

    match Url::parse(candidate) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if let Some(rest) = candidate
                .strip_prefix("//")
                .filter(|rest| !rest.starts_with('/'))
            {
                return Url::parse(&format!("{}://{}", host.scheme(), rest))
                    .map_err(|e| UrlError::Parse(format!("{}: {}", candidate, e)));
            }

            let relative = candidate.trim_start_matches('/');
            host.base_url()
                .join(relative)
                .map_err(|e| UrlError::Parse(format!("{}: {}", candidate, e)))
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", candidate, e))),
    }
}

/// Removes every leading `www.` label
///
/// `www.www.example.com` and `example.com` are the same site. A host that
/// is nothing but `www.` labels keeps its last one.
pub(crate) fn strip_www(host: &str) -> &str {
    let mut stripped = host;
    while let Some(rest) = stripped.strip_prefix("www.") {
        if rest.is_empty() {
            break;
        }
        stripped = rest;
    }
    stripped
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
///
/// Pairs keep their original encoded text, so `?flag` stays `?flag` and
/// `q=a%26b` is not re-encoded. Only the key is decoded for the tracking
/// check and the sort.
fn filter_and_sort_query_params(url: &Url) -> Vec<&str> {
    let mut params: Vec<(String, &str)> = url
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| (decoded_key(pair), pair))
        .filter(|(key, _)| !is_tracking_param(key))
        .collect();

    // Stable sort keeps repeated keys in their original relative order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params.into_iter().map(|(_, pair)| pair).collect()
}

fn decoded_key(pair: &str) -> String {
    let raw_key = pair.split_once('=').map_or(pair, |(key, _)| key);
    url::form_urlencoded::parse(raw_key.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
