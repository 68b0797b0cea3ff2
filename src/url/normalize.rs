use crate::config::DEFAULT_ALLOWED_DOMAINS;
use crate::url::domain::host_allowed;
use url::Url;

/// Query fragments that mark non-article wiki pages (edit, history, ...)
const EXCLUDED_QUERY_PATTERNS: &[&str] = &["action="];

/// Path fragments that mark wiki namespaces with no corpus value
const EXCLUDED_PATH_PATTERNS: &[&str] = &["/Special:", "/File:", "/Talk:"];

/// Canonicalizes candidate links and applies the frontier admission rules
///
/// The same normalizer is shared by the seeder and the link extractor so both
/// admit exactly the same set of URLs.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    allowed_domains: Vec<String>,
}

impl UrlNormalizer {
    /// Creates a normalizer admitting hosts that contain any of `allowed_domains`
    pub fn new<I, S>(allowed_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_domains: allowed_domains
                .into_iter()
                .map(|d| d.into().to_lowercase())
                .collect(),
        }
    }

    /// Normalizes `candidate` against `base`
    ///
    /// # Normalization Steps
    ///
    /// 1. Reject an empty (or whitespace-only) candidate
    /// 2. Resolve against `base` and drop the fragment
    /// 3. Reject schemes other than http and https
    /// 4. Reject hosts that contain none of the allow-listed domains
    /// 5. Reject `action=` queries and `/Special:`, `/File:`, `/Talk:` paths
    ///
    /// Never fails: anything that cannot be resolved is simply not admitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use corpus_crawler::url::UrlNormalizer;
    /// use url::Url;
    ///
    /// let normalizer = UrlNormalizer::new(["en.wikipedia.org"]);
    /// let base = Url::parse("https://en.wikipedia.org/wiki/Boeing_747").unwrap();
    ///
    /// let url = normalizer.normalize(&base, "/wiki/Airbus#History").unwrap();
    /// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Airbus");
    ///
    /// assert!(normalizer.normalize(&base, "/wiki/Talk:Boeing_747").is_none());
    /// assert!(normalizer.normalize(&base, "https://example.com/x").is_none());
    /// ```
    pub fn normalize(&self, base: &Url, candidate: &str) -> Option<Url> {
        if candidate.trim().is_empty() {
            return None;
        }

        let mut url = base.join(candidate).ok()?;
        url.set_fragment(None);

        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }

        let host = url.host_str()?;
        if !host_allowed(host, &self.allowed_domains) {
            return None;
        }

        if is_excluded(&url) {
            return None;
        }

        Some(url)
    }

    /// Normalizes an absolute URL string, such as a configured seed
    ///
    /// The URL serves as its own base, so relative input is rejected.
    pub fn normalize_absolute(&self, url_str: &str) -> Option<Url> {
        let base = Url::parse(url_str.trim()).ok()?;
        self.normalize(&base, url_str)
    }
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS.iter().copied())
    }
}

/// Returns true if the URL points at an excluded query or path pattern
fn is_excluded(url: &Url) -> bool {
    let query = url.query().unwrap_or("");
    if EXCLUDED_QUERY_PATTERNS.iter().any(|p| query.contains(p)) {
        return true;
    }

    let path = url.path();
    EXCLUDED_PATH_PATTERNS.iter().any(|p| path.contains(p))
}
