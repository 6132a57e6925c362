//! Snippet classification with a three-tier failure-recovery policy
//!
//! One completion call per snippet, low temperature. The response passes
//! through three tiers, strictly in order:
//!
//! 1. Parse - locate the first brace-delimited object in the response and
//!    decode it.
//! 2. Validate - each expected field is used when present and within its
//!    closed set; otherwise a safe generic default is substituted.
//! 3. Total fallback - when nothing decodable came back (or the call
//!    itself failed), synthesize a finding locally: substitute the
//!    matched term with the replacement system's name, default every
//!    category, force confidence low, and note the cause.
//!
//! Failure isolation is per snippet: no bad response or dead endpoint
//! aborts the remaining snippets or pages.

mod prompt;

pub use prompt::build_messages;

use crate::completion::CompletionModel;
use crate::config::HintsConfig;
use crate::detector::ReferenceSnippet;
use crate::report::{Audience, Confidence, Finding, ReferenceType, TaskCategory};
use regex::Regex;
use serde::Deserialize;

/// Replacement label used wherever a legacy term must be substituted
const REPLACEMENT_SYSTEM: &str = "Workday";

/// Generic feature label for tier-2/tier-3 defaults
const GENERIC_FEATURE: &str = "generic unified system";

/// Keyword pool used to pad short keyword lists up to the minimum of 3
const GENERIC_KEYWORDS: &[&str] = &["workday", "migration", "campus systems"];

/// Loosely-typed decoding target for the model's JSON
///
/// Every field is optional; tier 2 turns this into a fixed-field Finding
/// with mandatory defaulting, never an open map.
#[derive(Debug, Default, Deserialize)]
struct RawClassification {
    primary_audience: Option<String>,
    task_category: Option<String>,
    reference_type: Option<String>,
    workday_feature: Option<String>,
    proposed_replacement: Option<String>,
    suggested_keywords: Option<Vec<String>>,
    confidence: Option<String>,
}

/// Classifies one snippet; never fails
///
/// # Arguments
///
/// * `model` - The completion collaborator
/// * `snippet` - The reference snippet to classify
/// * `hints` - Caller-supplied audience/work-stream and keyword hints
/// * `temperature` - Sampling temperature (kept low for repeatability)
pub async fn classify(
    model: &dyn CompletionModel,
    snippet: &ReferenceSnippet,
    hints: &HintsConfig,
    temperature: f32,
) -> Finding {
    let messages = build_messages(snippet, hints);

    let response = match model.complete(&messages, temperature).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Completion call failed for {}: {}", snippet.source_url, e);
            return fallback_finding(snippet, format!("Completion call failed: {}", e));
        }
    };

    let Some(object) = extract_json_object(&response) else {
        tracing::warn!(
            "No JSON object in model response for {}",
            snippet.source_url
        );
        return fallback_finding(
            snippet,
            "Model response contained no parseable JSON object".to_string(),
        );
    };

    match serde_json::from_str::<RawClassification>(object) {
        Ok(raw) => validated_finding(snippet, raw),
        Err(e) => fallback_finding(snippet, format!("Model response was not decodable: {}", e)),
    }
}

/// Tier 2: field-by-field validation with safe generic defaults
fn validated_finding(snippet: &ReferenceSnippet, raw: RawClassification) -> Finding {
    let mut defaulted: Vec<&str> = Vec::new();

    let primary_audience = match raw.primary_audience.as_deref().and_then(Audience::parse_label) {
        Some(audience) => audience,
        None => {
            defaulted.push("primary_audience");
            Audience::MixedOther
        }
    };

    let task_category = match raw.task_category.as_deref().and_then(TaskCategory::parse_label) {
        Some(category) => category,
        None => {
            defaulted.push("task_category");
            TaskCategory::GenericSystemReference
        }
    };

    let reference_type = match raw
        .reference_type
        .as_deref()
        .and_then(ReferenceType::parse_label)
    {
        Some(reference) => reference,
        None => {
            defaulted.push("reference_type");
            ReferenceType::InformationalReference
        }
    };

    let workday_feature = match raw.workday_feature.filter(|f| !f.trim().is_empty()) {
        Some(feature) => feature.trim().to_string(),
        None => {
            defaulted.push("workday_feature");
            GENERIC_FEATURE.to_string()
        }
    };

    let proposed_replacement = match raw.proposed_replacement.filter(|r| !r.trim().is_empty()) {
        Some(replacement) => replacement.trim().to_string(),
        None => {
            defaulted.push("proposed_replacement");
            substitute_term(&snippet.text, &snippet.matched_term)
        }
    };

    let suggested_keywords = match raw.suggested_keywords {
        Some(keywords) if !keywords.is_empty() => clamp_keywords(keywords),
        _ => {
            defaulted.push("suggested_keywords");
            clamp_keywords(Vec::new())
        }
    };

    // Any defaulting above means the model answer was partially unusable;
    // the confidence tier must reflect that.
    let confidence = if defaulted.is_empty() {
        raw.confidence
            .as_deref()
            .and_then(Confidence::parse_label)
            .unwrap_or(Confidence::Low)
    } else {
        Confidence::Low
    };

    let notes = if defaulted.is_empty() {
        None
    } else {
        Some(format!(
            "Defaulted fields from an incomplete model response: {}",
            defaulted.join(", ")
        ))
    };

    Finding {
        html_context: snippet.text.clone(),
        primary_audience,
        task_category,
        reference_type,
        workday_feature,
        proposed_replacement,
        suggested_keywords,
        confidence,
        notes,
    }
}

/// Tier 3: fully local synthesis
fn fallback_finding(snippet: &ReferenceSnippet, cause: String) -> Finding {
    Finding {
        html_context: snippet.text.clone(),
        primary_audience: Audience::MixedOther,
        task_category: TaskCategory::GenericSystemReference,
        reference_type: ReferenceType::InformationalReference,
        workday_feature: GENERIC_FEATURE.to_string(),
        proposed_replacement: substitute_term(&snippet.text, &snippet.matched_term),
        suggested_keywords: clamp_keywords(Vec::new()),
        confidence: Confidence::Low,
        notes: Some(cause),
    }
}

/// Replaces every spelling of the matched term with the replacement
/// system's name. Internal spaces in the term match any amount of
/// whitespace, so "cougar web" also rewrites "CougarWeb".
fn substitute_term(text: &str, term: &str) -> String {
    let parts: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    match Regex::new(&format!("(?i){}", parts.join(r"\s*"))) {
        Ok(re) => re.replace_all(text, REPLACEMENT_SYSTEM).to_string(),
        Err(_) => text.to_string(),
    }
}

/// Enforces the 3-6 keyword band: truncate to 6, pad from the generic
/// pool to 3, drop blanks and duplicates.
fn clamp_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !cleaned.contains(&keyword) {
            cleaned.push(keyword);
        }
        if cleaned.len() == 6 {
            break;
        }
    }

    for generic in GENERIC_KEYWORDS {
        if cleaned.len() >= 3 {
            break;
        }
        if !cleaned.contains(&generic.to_string()) {
            cleaned.push(generic.to_string());
        }
    }

    cleaned
}

/// Locates the first balanced brace-delimited substring
///
/// Walks from the first `{`, tracking string literals and escapes, and
/// returns the slice up to its matching `}`. Returns nothing when no
/// balanced object exists.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, MockCompletionModel};

    fn snippet() -> ReferenceSnippet {
        ReferenceSnippet {
            source_url: "https://example.edu/advising".to_string(),
            text: "Log in to CougarWeb to register for classes.".to_string(),
            matched_term: "cougar web".to_string(),
        }
    }

    const GOOD_RESPONSE: &str = r#"{
        "primary_audience": "students",
        "task_category": "registration",
        "reference_type": "action_portal",
        "workday_feature": "Workday Student registration",
        "proposed_replacement": "Log in to Workday to register for classes.",
        "suggested_keywords": ["workday", "registration", "classes", "students"],
        "confidence": "high"
    }"#;

    #[tokio::test]
    async fn test_clean_response_used_verbatim() {
        let mock = MockCompletionModel::new();
        mock.push_response(GOOD_RESPONSE).await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.primary_audience, Audience::Students);
        assert_eq!(finding.task_category, TaskCategory::Registration);
        assert_eq!(finding.reference_type, ReferenceType::ActionPortal);
        assert_eq!(finding.confidence, Confidence::High);
        assert!(finding.notes.is_none());
        assert_eq!(finding.suggested_keywords.len(), 4);
    }

    #[tokio::test]
    async fn test_json_embedded_in_prose_still_parsed() {
        let mock = MockCompletionModel::new();
        mock.push_response(&format!(
            "Sure! Here is the classification you asked for:\n{}\nHope that helps.",
            GOOD_RESPONSE
        ))
        .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_invalid_enum_value_defaults_and_lowers_confidence() {
        let mock = MockCompletionModel::new();
        mock.push_response(
            r#"{
                "primary_audience": "everyone",
                "task_category": "registration",
                "reference_type": "action_portal",
                "workday_feature": "Workday Student",
                "proposed_replacement": "Use Workday.",
                "suggested_keywords": ["workday", "registration", "classes"],
                "confidence": "high"
            }"#,
        )
        .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.primary_audience, Audience::MixedOther);
        assert_eq!(finding.confidence, Confidence::Low);
        assert!(finding.notes.unwrap().contains("primary_audience"));
    }

    #[tokio::test]
    async fn test_unparseable_response_is_low_confidence_with_notes() {
        let mock = MockCompletionModel::new();
        mock.push_response("I could not classify this snippet, sorry!")
            .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.confidence, Confidence::Low);
        assert_eq!(finding.task_category, TaskCategory::GenericSystemReference);
        assert!(!finding.notes.clone().unwrap().is_empty());
        assert!(finding.proposed_replacement.contains("Workday"));
        assert!(!finding
            .proposed_replacement
            .to_lowercase()
            .contains("cougarweb"));
    }

    #[tokio::test]
    async fn test_transport_failure_synthesizes_locally() {
        let mock = MockCompletionModel::new();
        mock.push_error(CompletionError::Network("connection refused".to_string()))
            .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.confidence, Confidence::Low);
        assert!(finding.notes.unwrap().contains("Completion call failed"));
        assert_eq!(finding.proposed_replacement, "Log in to Workday to register for classes.");
    }

    #[tokio::test]
    async fn test_keyword_band_enforced() {
        let mock = MockCompletionModel::new();
        mock.push_response(
            r#"{
                "primary_audience": "students",
                "task_category": "registration",
                "reference_type": "action_portal",
                "workday_feature": "Workday Student",
                "proposed_replacement": "Use Workday.",
                "suggested_keywords": ["one", "two", "three", "four", "five", "six", "seven", "eight"],
                "confidence": "medium"
            }"#,
        )
        .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert_eq!(finding.suggested_keywords.len(), 6);
    }

    #[tokio::test]
    async fn test_too_few_keywords_padded() {
        let mock = MockCompletionModel::new();
        mock.push_response(
            r#"{
                "primary_audience": "students",
                "task_category": "registration",
                "reference_type": "action_portal",
                "workday_feature": "Workday Student",
                "proposed_replacement": "Use Workday.",
                "suggested_keywords": ["registration"],
                "confidence": "medium"
            }"#,
        )
        .await;

        let finding = classify(&mock, &snippet(), &HintsConfig::default(), 0.2).await;
        assert!(finding.suggested_keywords.len() >= 3);
        assert_eq!(finding.suggested_keywords[0], "registration");
    }

    #[test]
    fn test_extract_json_object_basic() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_json_object_nested_and_strings() {
        let text = r#"prefix {"a": {"b": "br}ace"}, "c": 2} suffix"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": "br}ace"}, "c": 2}"#)
        );
    }

    #[test]
    fn test_extract_json_object_unbalanced() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), None);
        assert_eq!(extract_json_object("no braces here"), None);
    }

    #[test]
    fn test_substitute_term_whitespace_variants() {
        assert_eq!(
            substitute_term("Open Cougar Web or CougarWeb today", "cougar web"),
            "Open Workday or Workday today"
        );
    }
}
