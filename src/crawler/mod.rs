//! Crawler module for bounded same-site discovery
//!
//! This module contains the crawl side of the scanner:
//! - HTTP fetching with a timeout and bounded redirects
//! - Regex-based link extraction restricted to the seed site
//! - A FIFO frontier with visited/exclude bookkeeping
//! - The breadth-first controller bounded by depth and URL count

mod controller;
mod extractor;
mod fetcher;
mod frontier;

pub use controller::crawl;
pub use extractor::extract_links;
pub use fetcher::{build_http_client, fetch_page};
pub use frontier::{merge_url_records, Frontier};

use serde::{Deserialize, Serialize};

/// Hard cap on crawl depth accepted by the scan operation
pub const MAX_DEPTH_CAP: u32 = 5;

/// Hard cap on URLs recorded by the scan operation
pub const MAX_URLS_CAP: usize = 300;

/// Lifecycle status of a discovered URL
///
/// Records start out `Pending`; only the analysis pass moves them to
/// `Analyzed` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStatus {
    Pending,
    Analyzed,
    Error,
}

/// A URL discovered during the crawl, keyed by its canonical form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Canonical absolute URL
    pub url: String,

    /// Breadth-first distance from the seed
    pub depth: u32,

    /// Lifecycle status
    #[serde(default = "UrlRecord::default_status")]
    pub status: UrlStatus,
}

impl UrlRecord {
    pub fn new(url: String, depth: u32) -> Self {
        Self {
            url,
            depth,
            status: UrlStatus::Pending,
        }
    }

    fn default_status() -> UrlStatus {
        UrlStatus::Pending
    }
}
