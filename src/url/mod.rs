//! URL handling for relicscan
//!
//! Canonicalization keeps deduplication stable across trailing-slash and
//! fragment variants of the same page; the same-site check restricts the
//! crawl to the seed host and its subdomains.

mod canonicalize;
mod domain;

pub use canonicalize::canonicalize_url;
pub use domain::{extract_host, is_same_site};
