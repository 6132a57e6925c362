//! Link extraction via pattern matching
//!
//! Anchors are found by scanning for href attributes rather than by
//! parsing the document structure; real-world pages are frequently
//! malformed enough that a strict parser would drop links a regex finds.

use crate::url::{canonicalize_url, extract_host, is_same_site};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Matches href attributes with double-quoted, single-quoted, or unquoted
/// values, case-insensitively and tolerant of whitespace around `=`.
fn href_regex() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| {
        Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
            .expect("href regex is valid")
    })
}

/// Extracts canonical same-site links from raw page markup
///
/// # Rules
///
/// - `javascript:`, `mailto:`, `tel:`, and `data:` targets are discarded
/// - Fragment-only targets (in-page anchors) are discarded
/// - Relative targets are resolved against `base_url`
/// - Only hosts equal to `seed_host` or subdomains of it are kept
/// - Results are canonicalized (no fragment, no trailing slash) and
///   deduplicated, preserving first-seen order
///
/// # Arguments
///
/// * `page_text` - Raw page markup
/// * `base_url` - The URL the page was fetched from
/// * `seed_host` - Host of the crawl seed
pub fn extract_links(page_text: &str, base_url: &Url, seed_host: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for captures in href_regex().captures_iter(page_text) {
        let raw = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().trim())
            .unwrap_or("");

        let Some(absolute) = resolve_href(raw, base_url) else {
            continue;
        };

        let Some(host) = extract_host(&absolute) else {
            continue;
        };
        if !is_same_site(&host, seed_host) {
            continue;
        }

        let Ok(canonical) = canonicalize_url(&absolute) else {
            continue;
        };

        if seen.insert(canonical.clone()) {
            links.push(canonical);
        }
    }

    links
}

/// Resolves a raw href to an absolute HTTP(S) URL, or discards it
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute.to_string())
    } else {
        None
    }
}
