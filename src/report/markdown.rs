//! Markdown rendering of the migration report
//!
//! A human-readable document export with the same fields as the JSON
//! encoding. It is rendered from the finished `Report` value so the two
//! encodings can never drift apart.

use crate::report::{Audience, Confidence, ReferenceType, Report, TaskCategory};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of a report to a file
pub fn render_markdown(report: &Report, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown(report);
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(())
}

/// Formats a report as a markdown document
pub fn format_markdown(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Legacy System Migration Report\n\n");

    md.push_str("## Scan Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(seed) = &report.seed_url {
        md.push_str(&format!("- **Seed URL**: {}\n", seed));
    }
    if !report.keyword_hints.is_empty() {
        md.push_str(&format!(
            "- **Keyword hints**: {}\n",
            report.keyword_hints.join(", ")
        ));
    }
    if !report.work_stream_hints.is_empty() {
        md.push_str(&format!(
            "- **Work streams**: {}\n",
            report.work_stream_hints.join(", ")
        ));
    }
    md.push_str(&format!("- **Pages scanned**: {}\n", report.total_scanned));
    md.push_str(&format!(
        "- **Pages with legacy references**: {}\n\n",
        report.total_with_findings
    ));

    if !report.urls.is_empty() {
        md.push_str("## Crawled URLs\n\n");
        md.push_str("| URL | Depth | Status |\n");
        md.push_str("|-----|-------|--------|\n");
        for record in &report.urls {
            md.push_str(&format!(
                "| {} | {} | {:?} |\n",
                record.url, record.depth, record.status
            ));
        }
        md.push('\n');
    }

    if report.recommended_updates.is_empty() {
        md.push_str("## Recommended Updates\n\nNo legacy-system references found.\n");
        return md;
    }

    md.push_str("## Recommended Updates\n\n");
    for result in &report.recommended_updates {
        match &result.page_title {
            Some(title) => md.push_str(&format!("### {} ({})\n\n", title, result.url)),
            None => md.push_str(&format!("### {}\n\n", result.url)),
        }

        for (i, finding) in result.findings.iter().enumerate() {
            md.push_str(&format!("#### Finding {}\n\n", i + 1));
            md.push_str(&format!("> {}\n\n", finding.html_context));
            md.push_str(&format!(
                "- **Audience**: {}\n",
                audience_label(finding.primary_audience)
            ));
            md.push_str(&format!(
                "- **Task category**: {}\n",
                category_label(finding.task_category)
            ));
            md.push_str(&format!(
                "- **Reference type**: {}\n",
                reference_label(finding.reference_type)
            ));
            md.push_str(&format!(
                "- **Workday feature**: {}\n",
                finding.workday_feature
            ));
            md.push_str(&format!(
                "- **Confidence**: {}\n",
                confidence_label(finding.confidence)
            ));
            md.push_str(&format!(
                "- **Suggested keywords**: {}\n",
                finding.suggested_keywords.join(", ")
            ));
            if let Some(notes) = &finding.notes {
                md.push_str(&format!("- **Notes**: {}\n", notes));
            }
            md.push_str(&format!(
                "\n**Proposed replacement:**\n\n{}\n\n",
                finding.proposed_replacement
            ));
        }
    }

    md
}

fn audience_label(audience: Audience) -> &'static str {
    match audience {
        Audience::Students => "Students",
        Audience::EmployeesFacultyStaff => "Employees / Faculty / Staff",
        Audience::MixedOther => "Mixed / Other",
    }
}

fn category_label(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Registration => "Registration",
        TaskCategory::FinancialAid => "Financial Aid",
        TaskCategory::StudentRecords => "Student Records",
        TaskCategory::HrBenefits => "HR & Benefits",
        TaskCategory::Payroll => "Payroll",
        TaskCategory::Procurement => "Procurement",
        TaskCategory::AccountAccess => "Account Access",
        TaskCategory::GenericSystemReference => "Generic System Reference",
    }
}

fn reference_label(reference: ReferenceType) -> &'static str {
    match reference {
        ReferenceType::ActionPortal => "Action portal",
        ReferenceType::InformationalReference => "Informational reference",
        ReferenceType::HistoricalReference => "Historical reference",
    }
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "High",
        Confidence::Medium => "Medium",
        Confidence::Low => "Low",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HintsConfig;
    use crate::crawler::UrlRecord;
    use crate::report::{build_report, AnalysisResult, Finding};

    fn sample_report() -> Report {
        let finding = Finding {
            html_context: "Log in to CougarWeb to register.".to_string(),
            primary_audience: Audience::Students,
            task_category: TaskCategory::Registration,
            reference_type: ReferenceType::ActionPortal,
            workday_feature: "Workday Student registration".to_string(),
            proposed_replacement: "Log in to Workday to register.".to_string(),
            suggested_keywords: vec![
                "workday".to_string(),
                "registration".to_string(),
                "student".to_string(),
            ],
            confidence: Confidence::High,
            notes: None,
        };
        build_report(
            &[UrlRecord::new("https://example.edu".to_string(), 0)],
            &[AnalysisResult::new(
                "https://example.edu".to_string(),
                Some("Home".to_string()),
                vec![finding],
            )],
            &HintsConfig {
                keywords: vec!["registration".to_string()],
                work_streams: vec!["student".to_string()],
            },
            Some("https://example.edu".to_string()),
        )
    }

    #[test]
    fn test_markdown_contains_all_fields() {
        let md = format_markdown(&sample_report());
        assert!(md.contains("# Legacy System Migration Report"));
        assert!(md.contains("**Seed URL**: https://example.edu"));
        assert!(md.contains("**Pages scanned**: 1"));
        assert!(md.contains("Home (https://example.edu)"));
        assert!(md.contains("Log in to CougarWeb to register."));
        assert!(md.contains("**Workday feature**: Workday Student registration"));
        assert!(md.contains("workday, registration, student"));
    }

    #[test]
    fn test_markdown_empty_findings() {
        let report = build_report(&[], &[], &HintsConfig::default(), None);
        let md = format_markdown(&report);
        assert!(md.contains("No legacy-system references found."));
    }

    #[test]
    fn test_render_markdown_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        render_markdown(&sample_report(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Legacy System Migration Report"));
    }
}
