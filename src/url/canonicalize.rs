use crate::UrlError;
use url::Url;

/// Canonicalizes a URL for stable deduplication
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject non-HTTP(S) schemes
/// 3. Lowercase the host
/// 4. Remove the fragment (everything after #)
/// 5. Remove the trailing slash from the path (except for root /)
///
/// The transformation is idempotent: canonicalizing an already-canonical
/// URL returns the same string.
///
/// # Arguments
///
/// * `url_str` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(String)` - Canonical absolute URL
/// * `Err(UrlError)` - Failed to parse or canonicalize the URL
///
/// # Examples
///
/// ```
/// use relicscan::url::canonicalize_url;
///
/// let url = canonicalize_url("https://example.edu/page/#section").unwrap();
/// assert_eq!(url, "https://example.edu/page");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Parsed http(s) URLs always carry a host; the error arm stands in
    // for the Option rather than a panic.
    let Some(host) = url.host_str() else {
        return Err(UrlError::MissingHost);
    };
    let lowered = host.to_lowercase();
    if lowered != host {
        url.set_host(Some(&lowered))
            .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;
    }

    url.set_fragment(None);

    // Drop the trailing slash from the path itself, so the slash variants
    // match even when a query string follows.
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    let mut canonical = url.to_string();

    // "https://example.edu/" and "https://example.edu" are the same page;
    // keep the host-only form so both spellings canonicalize identically.
    if url.path() == "/" && url.query().is_none() && canonical.ends_with('/') {
        canonical.pop();
    }

    Ok(canonical)
}
