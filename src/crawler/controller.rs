//! Crawl controller - breadth-first traversal bounded by depth and count
//!
//! BFS (not DFS) so shallow, high-value pages make the list even when the
//! URL cap truncates the crawl. The exclude set lets repeated scans of the
//! same site skip pages recorded by a previous run without re-fetching
//! them.

use crate::crawler::{
    extract_links, fetch_page, Frontier, UrlRecord, MAX_DEPTH_CAP, MAX_URLS_CAP,
};
use crate::url::{canonicalize_url, extract_host};
use crate::{ScanError, UrlError};
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Crawls a site breadth-first from a seed URL
///
/// For each dequeued URL: skip it if already visited (excluded and
/// over-depth URLs never enter the queue, and none of these count
/// against the total). Otherwise record it, and while the depth and
/// count budgets allow, fetch it and enqueue newly discovered same-site
/// links at depth + 1. A fetch failure keeps the node in the result with
/// zero outbound links.
///
/// # Arguments
///
/// * `client` - HTTP client from [`crate::crawler::build_http_client`]
/// * `seed_url` - Starting point; must parse as an absolute HTTP(S) URL
/// * `max_depth` - Maximum breadth-first distance from the seed (<= 5)
/// * `max_urls` - Maximum records returned (<= 300)
/// * `exclude` - URLs from prior scans to skip entirely
///
/// # Errors
///
/// `ScanError::Validation` for a malformed seed or a cap violation; the
/// traversal is not started in either case. Per-node fetch failures are
/// never errors.
pub async fn crawl(
    client: &Client,
    seed_url: &str,
    max_depth: u32,
    max_urls: usize,
    exclude: &[String],
) -> Result<Vec<UrlRecord>, ScanError> {
    if max_depth > MAX_DEPTH_CAP {
        return Err(ScanError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_CAP, max_depth
        )));
    }
    if max_urls == 0 || max_urls > MAX_URLS_CAP {
        return Err(ScanError::Validation(format!(
            "max_urls must be between 1 and {}, got {}",
            MAX_URLS_CAP, max_urls
        )));
    }

    let seed = canonicalize_url(seed_url)
        .map_err(|e| ScanError::Validation(format!("Invalid seed URL '{}': {}", seed_url, e)))?;
    let seed_host = extract_host(&seed).ok_or(UrlError::MissingHost)?;

    // Exclude entries are canonicalized so that slash/fragment variants
    // still match; entries that fail to parse are ignored.
    let excluded: HashSet<String> = exclude
        .iter()
        .filter_map(|u| canonicalize_url(u).ok())
        .collect();

    let mut frontier = Frontier::new(excluded);
    let mut records: Vec<UrlRecord> = Vec::new();

    frontier.enqueue(seed.clone(), 0);
    tracing::info!("Starting crawl of {} (depth <= {}, urls <= {})", seed, max_depth, max_urls);

    while let Some(item) = frontier.next() {
        if records.len() >= max_urls {
            break;
        }
        if frontier.is_visited(&item.url) {
            continue;
        }
        // Children are only enqueued below the depth cap, so nothing
        // deeper than max_depth can be dequeued.
        debug_assert!(item.depth <= max_depth);

        frontier.mark_visited(&item.url);
        records.push(UrlRecord::new(item.url.clone(), item.depth));
        tracing::debug!("Recorded {} at depth {}", item.url, item.depth);

        // Expanding a leaf-depth node or a node past the count budget
        // would only discover children we can never record.
        if item.depth >= max_depth || records.len() >= max_urls {
            continue;
        }

        let Some(body) = fetch_page(client, &item.url).await else {
            // No content, no children; the record itself stays.
            continue;
        };

        let Ok(base) = Url::parse(&item.url) else {
            continue;
        };
        for link in extract_links(&body, &base, &seed_host) {
            frontier.enqueue(link, item.depth + 1);
        }

        if records.len() % 25 == 0 {
            tracing::info!(
                "Progress: {} recorded, {} queued",
                records.len(),
                frontier.len()
            );
        }
    }

    tracing::info!("Crawl complete: {} URLs recorded", records.len());
    Ok(records)
}
