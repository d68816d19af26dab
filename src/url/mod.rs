//! URL handling module for Sumi-Sitemap
//!
//! This module provides host derivation, scope checks, link resolution and
//! the canonical normalization that decides page identity during a crawl.

mod host;
mod normalize;

pub use host::{derive_host, in_scope, Host};
pub use normalize::{canonicalize, normalize_url, normalize_url_with, resolve_absolute, NormalizeOptions};

use crate::UrlResult;
use url::Url;

/// Turns a raw link found on a page into a canonical in-scope URL
///
/// The scope check runs on the resolved URL, before normalization, so it
/// agrees with [`in_scope`] by construction. Links that cannot be resolved or
/// normalized are reported as errors; links that resolve to another site
/// yield `Ok(None)`.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::{admit_link, derive_host, NormalizeOptions};
///
/// let host = derive_host("https://example.com/").unwrap();
/// let options = NormalizeOptions::default();
///
/// let admitted = admit_link("/about/", &host, &options).unwrap();
/// assert_eq!(admitted.unwrap().as_str(), "https://example.com/about");
///
/// let foreign = admit_link("https://other.com/", &host, &options).unwrap();
/// assert!(foreign.is_none());
/// ```
pub fn admit_link(
    raw: &str,
    host: &Host,
    options: &NormalizeOptions,
) -> UrlResult<Option<Url>> {
    let absolute = resolve_absolute(raw, host)?;
    if !host.contains(&absolute) {
        return Ok(None);
    }

    canonicalize(absolute, options).map(Some)
}
