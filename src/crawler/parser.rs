//! HTML parser for extracting links
//!
//! This module is the parse collaborator of the crawl: it turns fetched bytes
//! into a DOM tree and walks that tree for anchor targets. Targets are
//! returned exactly as written in the document; resolution and scoping happen
//! in the `url` module.

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors raised while turning a page body into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("page body is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw href values of every anchor, in document order
    pub links: Vec<String>,
}

/// Parses a page body into a document tree
///
/// html5ever recovers from malformed markup, so the only failure is a body
/// that is not UTF-8 text.
pub fn parse_document(body: &[u8]) -> Result<Html, ParseError> {
    let text = std::str::from_utf8(body)?;
    Ok(Html::parse_document(text))
}

/// Parses a page body and extracts its title and links
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::parse_page;
///
/// let html = br#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html).unwrap();
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_page(body: &[u8]) -> Result<ParsedPage, ParseError> {
    let document = parse_document(body)?;

    Ok(ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
    })
}

/// Extracts the raw href of every `<a>` element, in document order
///
/// The walk is depth-first over an explicit stack, so arbitrarily deep
/// documents cannot exhaust the call stack. No normalization, filtering or
/// deduplication is applied.
pub fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        if let Some(element) = node.value().as_element() {
            if element.name() == "a" {
                if let Some(href) = element.attr("href") {
                    links.push(href.to_string());
                }
            }
        }

        // Reversed so the first child is popped first
        stack.extend(node.children().rev());
    }

    links
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
