//! Per-URL analysis pass: fetch, detect, classify
//!
//! Deliberately sequential: one fetch and one completion call in flight
//! at a time, so the target site sees a polite request rate and the
//! completion collaborator a bounded call rate, and results come back in
//! request order. This loop is the only place URL records move from
//! `Pending` to `Analyzed` or `Error`.

use crate::classifier::classify;
use crate::completion::CompletionModel;
use crate::config::Config;
use crate::crawler::{fetch_page, UrlRecord, UrlStatus};
use crate::detector::{detect, extract_title};
use crate::report::AnalysisResult;
use crate::ScanError;
use reqwest::Client;

/// Hard cap on URLs accepted by the analyze operation
pub const MAX_ANALYZE_URLS: usize = 500;

/// Analyzes each URL record in order, returning one result per record
///
/// Records are mutated in place: `Analyzed` after a successful pass,
/// `Error` when the page could not be fetched. A fetch failure still
/// yields a (finding-free) result for that URL; the loop never aborts
/// early on per-page trouble.
///
/// # Errors
///
/// `ScanError::Validation` when the record list is empty or exceeds the
/// cap; nothing is fetched in that case.
pub async fn analyze(
    client: &Client,
    model: &dyn CompletionModel,
    records: &mut [UrlRecord],
    config: &Config,
) -> Result<Vec<AnalysisResult>, ScanError> {
    if records.is_empty() {
        return Err(ScanError::Validation(
            "The analyze operation requires at least one URL".to_string(),
        ));
    }
    if records.len() > MAX_ANALYZE_URLS {
        return Err(ScanError::Validation(format!(
            "The analyze operation accepts at most {} URLs, got {}",
            MAX_ANALYZE_URLS,
            records.len()
        )));
    }

    tracing::info!("Analyzing {} URLs", records.len());
    let mut results = Vec::with_capacity(records.len());

    for record in records.iter_mut() {
        let Some(body) = fetch_page(client, &record.url).await else {
            record.status = UrlStatus::Error;
            results.push(AnalysisResult::new(record.url.clone(), None, Vec::new()));
            continue;
        };

        let title = extract_title(&body);
        let snippets = detect(&record.url, &body, &config.detection);
        tracing::debug!("{}: {} reference snippet(s)", record.url, snippets.len());

        let mut findings = Vec::with_capacity(snippets.len());
        for snippet in &snippets {
            // One call in flight at a time; per-snippet failures are
            // absorbed by the classifier's fallback tiers.
            let finding =
                classify(model, snippet, &config.hints, config.model.temperature).await;
            findings.push(finding);
        }

        record.status = UrlStatus::Analyzed;
        results.push(AnalysisResult::new(record.url.clone(), title, findings));
    }

    let with_findings = results.iter().filter(|r| r.has_legacy_references).count();
    tracing::info!(
        "Analysis complete: {} pages, {} with legacy references",
        results.len(),
        with_findings
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MockCompletionModel;
    use crate::config::{Config, CrawlerConfig, UserAgentConfig};
    use crate::crawler::build_http_client;

    fn client() -> Client {
        build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_is_validation_error() {
        let mock = MockCompletionModel::new();
        let mut records: Vec<UrlRecord> = Vec::new();
        let result = analyze(&client(), &mock, &mut records, &Config::default()).await;
        assert!(matches!(result.unwrap_err(), ScanError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cap_is_validation_error() {
        let mock = MockCompletionModel::new();
        let mut records: Vec<UrlRecord> = (0..501)
            .map(|i| UrlRecord::new(format!("https://example.edu/p{}", i), 0))
            .collect();
        let result = analyze(&client(), &mock, &mut records, &Config::default()).await;
        assert!(matches!(result.unwrap_err(), ScanError::Validation(_)));
        // Validation happens before any network traffic
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_url_marked_error() {
        let mock = MockCompletionModel::new();
        let mut records = vec![UrlRecord::new("http://127.0.0.1:1/".to_string(), 0)];
        let results = analyze(&client(), &mock, &mut records, &Config::default())
            .await
            .unwrap();

        assert_eq!(records[0].status, UrlStatus::Error);
        assert_eq!(results.len(), 1);
        assert!(!results[0].has_legacy_references);
        assert!(results[0].findings.is_empty());
    }
}
