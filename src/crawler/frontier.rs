//! Frontier bookkeeping for the breadth-first crawl
//!
//! The frontier owns the FIFO queue, the visited set, and the exclude
//! set. All three operate on canonical URLs; the queue never holds two
//! entries for the same canonical form.

use crate::crawler::UrlRecord;
use std::collections::{HashMap, HashSet, VecDeque};

/// A queued URL with its breadth-first depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: String,
    pub depth: u32,
}

/// Queue + visited-set structure driving breadth-first crawl order
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    excluded: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier with the given exclude set (canonical URLs)
    pub fn new(excluded: HashSet<String>) -> Self {
        Self {
            excluded,
            ..Default::default()
        }
    }

    /// Enqueues a canonical URL unless it is already queued, visited, or
    /// excluded. Returns whether it was accepted.
    pub fn enqueue(&mut self, url: String, depth: u32) -> bool {
        if self.visited.contains(&url) || self.excluded.contains(&url) || self.queued.contains(&url)
        {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Pops the next URL in FIFO order
    pub fn next(&mut self) -> Option<QueuedUrl> {
        let item = self.queue.pop_front()?;
        self.queued.remove(&item.url);
        Some(item)
    }

    /// Marks a URL visited. Returns false if it was already visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        self.excluded.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Merges two ordered URL record lists by canonical URL
///
/// Used by callers that persist URL lists between scans and re-ingest
/// them. Existing records keep their position; an incoming record for a
/// known URL overwrites depth and status (last write wins), and new URLs
/// append in their incoming order.
pub fn merge_url_records(existing: Vec<UrlRecord>, incoming: Vec<UrlRecord>) -> Vec<UrlRecord> {
    let mut merged = existing;
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, r)| (r.url.clone(), i))
        .collect();

    for record in incoming {
        match index.get(&record.url) {
            Some(&i) => {
                merged[i] = record;
            }
            None => {
                index.insert(record.url.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}
