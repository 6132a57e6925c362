//! Configuration module for relicscan
//!
//! Handles loading, parsing, and validating TOML configuration files.
//! Every section carries defaults, so the scanner runs without a config
//! file; a file only overrides the pieces it names.
//!
//! # Example
//!
//! ```no_run
//! use relicscan::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("relicscan.toml")).unwrap();
//! println!("Crawl depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    Config, CrawlerConfig, DetectionConfig, HintsConfig, ModelConfig, UserAgentConfig,
};
pub use validation::validate;
