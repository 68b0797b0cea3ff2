//! HTML parser for link discovery
//!
//! This module parses fetched documents and turns their hyperlinks into the
//! set of admissible frontier candidates.

use crate::url::UrlNormalizer;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts every admissible outbound link from an HTML document
///
/// Each `<a href>` is passed through the normalizer against `base_url`;
/// rejected links are dropped silently. Duplicates within the page collapse
/// into one entry. Deduplication across pages is left to the frontier store.
///
/// # Example
///
/// ```
/// use corpus_crawler::crawler::extract_links;
/// use corpus_crawler::url::UrlNormalizer;
/// use url::Url;
///
/// let html = r#"<a href="/wiki/Airbus">Airbus</a><a href="/wiki/Airbus#A380">A380</a>"#;
/// let base = Url::parse("https://en.wikipedia.org/wiki/Boeing_747").unwrap();
/// let links = extract_links(html, &base, &UrlNormalizer::default());
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_links(html: &str, base_url: &Url, normalizer: &UrlNormalizer) -> BTreeSet<Url> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                match normalizer.normalize(base_url, href) {
                    Some(url) => {
                        links.insert(url);
                    }
                    None => tracing::trace!("Dropped link {} on {}", href, base_url),
                }
            }
        }
    }

    links
}
