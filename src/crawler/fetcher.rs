//! HTTP fetcher implementation
//!
//! One GET per URL with a fixed timeout, bounded redirect following, and a
//! descriptive user agent. Every failure mode collapses to "no content":
//! the crawl controller never distinguishes fetch-failure causes.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds the HTTP client used for all page fetches
///
/// The user agent follows the crawler convention
/// `Name/Version (+ContactURL; ContactEmail)` so site operators can
/// identify and reach us.
///
/// # Arguments
///
/// * `crawler` - Timeout and redirect limits
/// * `user_agent` - Identification fields for the UA header
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let ua = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(ua)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, returning its body text or nothing
///
/// Network errors, timeouts, redirect-limit hits, non-success status
/// codes, and non-HTML content types are all treated uniformly: logged
/// and mapped to `None`. Nothing escapes this boundary as an error.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                tracing::warn!("Timeout fetching {}", url);
            } else if e.is_redirect() {
                tracing::warn!("Redirect limit reached fetching {}", url);
            } else {
                tracing::warn!("Network error fetching {}: {}", url, e);
            }
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Non-success status {} for {}", status, url);
        return None;
    }

    // Only textual content is worth scanning; PDFs, images, and other
    // binary payloads would feed garbage to the extractor and detector.
    // Sites do mis-serve HTML as text/plain, so any text/* passes; a
    // missing header gets the benefit of the doubt.
    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        let content_type = content_type.to_lowercase();
        if !content_type.starts_with("text/") && !content_type.contains("html") {
            tracing::debug!("Skipping content type '{}' for {}", content_type, url);
            return None;
        }
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", url, e);
            None
        }
    }
}
