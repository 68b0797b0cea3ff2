use url::Url;

/// Checks a host against the allow-list
///
/// Matching is by substring: `en.wikipedia.org` admits `en.wikipedia.org` and
/// also any host that happens to contain it, such as `en.wikipedia.org.mirror.net`.
pub fn host_allowed(host: &str, allowed_domains: &[String]) -> bool {
    let host = host.to_lowercase();
    allowed_domains
        .iter()
        .any(|domain| host.contains(domain.as_str()))
}

/// Site names recorded as a document's source, keyed by the domain the host contains
const SITE_NAMES: &[(&str, &str)] = &[("wikipedia.org", "Wikipedia"), ("fandom.com", "Fandom")];

/// Label used for hosts that belong to no known site
const UNKNOWN_SITE: &str = "Unknown";

/// Derives the site name recorded as a completed document's source
///
/// The host is matched by substring, the same way the allow-list admits it,
/// so a host such as `en.wikipedia.org.mirror.net` is still `Wikipedia`.
/// Anything else is labelled `Unknown`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use corpus_crawler::url::source_label;
///
/// let url = Url::parse("https://aviation.fandom.com/wiki/Boeing_747").unwrap();
/// assert_eq!(source_label(&url), "Fandom");
/// ```
pub fn source_label(url: &Url) -> String {
    let host = url.host_str().unwrap_or("").to_lowercase();

    SITE_NAMES
        .iter()
        .find(|(domain, _)| host.contains(domain))
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_SITE)
        .to_string()
}
