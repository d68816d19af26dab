//! Sitemap protocol serialization
//!
//! Renders a set of URLs as a `urlset` document. Entries are sorted
//! lexicographically so the output does not depend on discovery order.

use quick_xml::escape::escape;
use std::collections::BTreeSet;

/// Namespace of the sitemap protocol root element
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders URLs as a sitemap XML document
///
/// Each distinct URL becomes exactly one `<url><loc>` entry; duplicates in
/// the input collapse.
///
/// # Example
///
/// ```
/// use sumi_sitemap::output::render;
///
/// let xml = render(["https://example.com/b", "https://example.com/a"]);
/// let a = xml.find("https://example.com/a").unwrap();
/// let b = xml.find("https://example.com/b").unwrap();
/// assert!(a < b);
/// assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
/// ```
pub fn render<I, S>(urls: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted: BTreeSet<String> = urls.into_iter().map(|u| u.as_ref().to_string()).collect();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));

    for url in &sorted {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(url.as_str())));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::escape::unescape;

    /// Pulls the text of every <loc> element back out, undoing the escaping
    fn locs(xml: &str) -> Vec<String> {
        xml.split("<loc>")
            .skip(1)
            .filter_map(|rest| rest.split_once("</loc>").map(|(loc, _)| loc))
            .map(|loc| unescape(loc).unwrap().into_owned())
            .collect()
    }

    #[test]
    fn test_empty_set_is_valid_document() {
        let xml = render(Vec::<String>::new());
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             </urlset>\n"
        );
    }

    #[test]
    fn test_exact_layout() {
        let xml = render(["https://example.com/"]);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             \x20 <url>\n\
             \x20   <loc>https://example.com/</loc>\n\
             \x20 </url>\n\
             </urlset>\n"
        );
    }

    #[test]
    fn test_sorted_lexicographically() {
        let xml = render([
            "https://example.com/zeta",
            "https://example.com/",
            "https://example.com/about",
        ]);
        assert_eq!(
            locs(&xml),
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/zeta",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let xml = render(["https://example.com/a", "https://example.com/a"]);
        assert_eq!(locs(&xml).len(), 1);
    }

    #[test]
    fn test_escapes_special_characters() {
        let xml = render(["https://example.com/search?a=1&b=<2>"]);
        assert!(xml.contains("<loc>https://example.com/search?a=1&amp;b=&lt;2&gt;</loc>"));
        assert!(!xml.contains("a=1&b"));
    }

    #[test]
    fn test_escapes_quotes() {
        let xml = render([r#"https://example.com/it's/"q""#]);
        assert!(xml.contains("<loc>https://example.com/it&apos;s/&quot;q&quot;</loc>"));
    }

    #[test]
    fn test_locs_are_a_bijection_with_input() {
        let input: BTreeSet<String> = [
            "https://example.com/",
            "https://example.com/about",
            "https://example.com/list?page=2&sort=asc",
            "https://example.com/it's",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let xml = render(&input);
        let output: Vec<String> = locs(&xml);
        let output_set: BTreeSet<String> = output.iter().cloned().collect();

        assert_eq!(output.len(), input.len());
        assert_eq!(output_set, input);
    }
}
