//! Relicscan: a legacy-system reference scanner
//!
//! This crate crawls a target website, finds textual references to two
//! legacy organizational systems (CougarWeb and Colleague), and asks a
//! text-completion model to classify each reference and propose rewritten
//! copy ahead of the Workday migration. The output is a structured
//! migration report.

pub mod analyzer;
pub mod classifier;
pub mod completion;
pub mod config;
pub mod crawler;
pub mod detector;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for relicscan operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Completion service error: {0}")]
    Completion(#[from] completion::CompletionError),

    #[error("Operation exceeded the overall time ceiling of {seconds}s")]
    OperationTimeout { seconds: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for relicscan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Runs a future under the overall wall-clock ceiling
///
/// Exceeding the ceiling fails the whole operation; there is no
/// partial-success return.
pub async fn with_time_ceiling<F, T>(seconds: u64, operation: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio::time::timeout(std::time::Duration::from_secs(seconds), operation).await {
        Ok(result) => result,
        Err(_) => Err(ScanError::OperationTimeout { seconds }),
    }
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{UrlRecord, UrlStatus};
pub use report::{AnalysisResult, Finding, Report};
pub use url::{canonicalize_url, extract_host, is_same_site};
