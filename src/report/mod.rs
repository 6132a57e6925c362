//! Report data model and builder
//!
//! Findings, per-page analysis results, and the aggregated migration
//! report. The report is purely derived data: it joins crawl records with
//! analysis results by canonical URL and has no identity of its own. The
//! JSON export and the markdown rendering are alternate serializations of
//! the same value, never divergent sources of truth.

mod markdown;

pub use markdown::render_markdown;

use crate::config::HintsConfig;
use crate::crawler::UrlRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a page reference is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Students,
    EmployeesFacultyStaff,
    MixedOther,
}

impl Audience {
    /// Parses a wire label; used when validating model output.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "students" => Some(Self::Students),
            "employees_faculty_staff" => Some(Self::EmployeesFacultyStaff),
            "mixed_other" => Some(Self::MixedOther),
            _ => None,
        }
    }
}

/// What the referenced page copy helps someone do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Registration,
    FinancialAid,
    StudentRecords,
    HrBenefits,
    Payroll,
    Procurement,
    AccountAccess,
    GenericSystemReference,
}

impl TaskCategory {
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "registration" => Some(Self::Registration),
            "financial_aid" => Some(Self::FinancialAid),
            "student_records" => Some(Self::StudentRecords),
            "hr_benefits" => Some(Self::HrBenefits),
            "payroll" => Some(Self::Payroll),
            "procurement" => Some(Self::Procurement),
            "account_access" => Some(Self::AccountAccess),
            "generic_system_reference" => Some(Self::GenericSystemReference),
            _ => None,
        }
    }
}

/// How the legacy system is being referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    ActionPortal,
    InformationalReference,
    HistoricalReference,
}

impl ReferenceType {
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "action_portal" => Some(Self::ActionPortal),
            "informational_reference" => Some(Self::InformationalReference),
            "historical_reference" => Some(Self::HistoricalReference),
            _ => None,
        }
    }
}

/// Confidence tier of a classification/rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// One classified legacy-system reference with proposed replacement copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// The snippet the classification is about
    pub html_context: String,

    pub primary_audience: Audience,

    pub task_category: TaskCategory,

    pub reference_type: ReferenceType,

    /// Short label for the Workday feature replacing the legacy system
    pub workday_feature: String,

    /// Rewritten copy preserving the original tone and intent
    pub proposed_replacement: String,

    /// 3-6 SEO keywords for the updated page
    pub suggested_keywords: Vec<String>,

    /// Always low when any upstream ambiguity or failure occurred
    pub confidence: Confidence,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Analysis outcome for one page
///
/// `findings` is empty exactly when `has_legacy_references` is false; the
/// two fields are never independently inconsistent, so construction goes
/// through [`AnalysisResult::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,

    pub has_legacy_references: bool,

    pub findings: Vec<Finding>,
}

impl AnalysisResult {
    pub fn new(url: String, page_title: Option<String>, findings: Vec<Finding>) -> Self {
        Self {
            url,
            page_title,
            has_legacy_references: !findings.is_empty(),
            findings,
        }
    }
}

/// The aggregated migration report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_url: Option<String>,

    pub keyword_hints: Vec<String>,

    pub work_stream_hints: Vec<String>,

    /// Number of pages scanned
    pub total_scanned: usize,

    /// Number of pages with at least one finding
    pub total_with_findings: usize,

    /// Every URL the crawl recorded, with depth and status
    pub urls: Vec<UrlRecord>,

    /// Per-URL recommended updates, findings only
    pub recommended_updates: Vec<AnalysisResult>,
}

/// Builds the migration report from crawl records and analysis results
///
/// Records and results join by canonical URL; results for URLs the crawl
/// never recorded still count as scanned pages (the analyze operation
/// accepts arbitrary URL lists).
pub fn build_report(
    url_records: &[UrlRecord],
    results: &[AnalysisResult],
    hints: &HintsConfig,
    seed_url: Option<String>,
) -> Report {
    let total_with_findings = results.iter().filter(|r| r.has_legacy_references).count();
    let recommended_updates: Vec<AnalysisResult> = results
        .iter()
        .filter(|r| r.has_legacy_references)
        .cloned()
        .collect();

    Report {
        generated_at: Utc::now(),
        seed_url,
        keyword_hints: hints.keywords.clone(),
        work_stream_hints: hints.work_streams.clone(),
        total_scanned: results.len(),
        total_with_findings,
        urls: url_records.to_vec(),
        recommended_updates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::UrlRecord;

    fn finding(context: &str) -> Finding {
        Finding {
            html_context: context.to_string(),
            primary_audience: Audience::Students,
            task_category: TaskCategory::Registration,
            reference_type: ReferenceType::ActionPortal,
            workday_feature: "Workday Student registration".to_string(),
            proposed_replacement: "Register for classes in Workday.".to_string(),
            suggested_keywords: vec![
                "workday".to_string(),
                "registration".to_string(),
                "classes".to_string(),
            ],
            confidence: Confidence::High,
            notes: None,
        }
    }

    #[test]
    fn test_analysis_result_invariant() {
        let with = AnalysisResult::new("https://example.edu/a".to_string(), None, vec![finding("x")]);
        assert!(with.has_legacy_references);

        let without = AnalysisResult::new("https://example.edu/b".to_string(), None, vec![]);
        assert!(!without.has_legacy_references);
        assert!(without.findings.is_empty());
    }

    #[test]
    fn test_build_report_counts() {
        let records = vec![
            UrlRecord::new("https://example.edu".to_string(), 0),
            UrlRecord::new("https://example.edu/a".to_string(), 1),
        ];
        let results = vec![
            AnalysisResult::new("https://example.edu".to_string(), None, vec![finding("x")]),
            AnalysisResult::new("https://example.edu/a".to_string(), None, vec![]),
        ];

        let report = build_report(
            &records,
            &results,
            &HintsConfig::default(),
            Some("https://example.edu".to_string()),
        );

        assert_eq!(report.total_scanned, 2);
        assert_eq!(report.total_with_findings, 1);
        assert_eq!(report.urls.len(), 2);
        assert_eq!(report.recommended_updates.len(), 1);
        assert_eq!(report.recommended_updates[0].url, "https://example.edu");
    }

    #[test]
    fn test_enum_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Audience::EmployeesFacultyStaff).unwrap(),
            "\"employees_faculty_staff\""
        );
        assert_eq!(
            serde_json::to_string(&TaskCategory::GenericSystemReference).unwrap(),
            "\"generic_system_reference\""
        );
        assert_eq!(
            serde_json::to_string(&ReferenceType::ActionPortal).unwrap(),
            "\"action_portal\""
        );
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_parse_label_roundtrip() {
        assert_eq!(Audience::parse_label("students"), Some(Audience::Students));
        assert_eq!(Audience::parse_label(" Mixed_Other "), Some(Audience::MixedOther));
        assert_eq!(Audience::parse_label("everyone"), None);
        assert_eq!(
            TaskCategory::parse_label("financial_aid"),
            Some(TaskCategory::FinancialAid)
        );
        assert_eq!(Confidence::parse_label("HIGH"), Some(Confidence::High));
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = build_report(
            &[UrlRecord::new("https://example.edu".to_string(), 0)],
            &[AnalysisResult::new(
                "https://example.edu".to_string(),
                Some("Home".to_string()),
                vec![finding("x")],
            )],
            &HintsConfig::default(),
            None,
        );

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_scanned, 1);
        assert_eq!(back.recommended_updates[0].findings.len(), 1);
    }
}
