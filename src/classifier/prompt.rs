//! Prompt construction for snippet classification

use crate::completion::ChatMessage;
use crate::config::HintsConfig;
use crate::detector::ReferenceSnippet;

const SYSTEM_CONTEXT: &str = "You are helping a college web team migrate its website away from \
two legacy systems: CougarWeb (the student/employee portal) and Colleague (the ERP behind it). \
Both are being replaced by Workday. You review snippets of page copy that mention a legacy \
system and produce structured migration guidance. Answer with a single JSON object and nothing \
else.";

/// Builds the role-tagged messages for one snippet
///
/// The user message restates the closed enumerations verbatim so the
/// model cannot drift into free-form labels, and pins down the rewrite
/// rules: keep tone and intent, never invent URLs.
pub fn build_messages(snippet: &ReferenceSnippet, hints: &HintsConfig) -> Vec<ChatMessage> {
    let mut user = String::new();

    user.push_str(&format!(
        "Page: {}\nMatched legacy term: {}\nSnippet:\n\"\"\"\n{}\n\"\"\"\n\n",
        snippet.source_url, snippet.matched_term, snippet.text
    ));

    if !hints.work_streams.is_empty() {
        user.push_str(&format!(
            "The migration work streams in scope are: {}. Prefer classifications relevant to \
             them.\n",
            hints.work_streams.join(", ")
        ));
    }
    if !hints.keywords.is_empty() {
        user.push_str(&format!(
            "Where natural, favor these keywords in the rewritten copy: {}.\n",
            hints.keywords.join(", ")
        ));
    }

    user.push_str(
        "\nFirst confirm the snippet refers to the legacy system (not the word's everyday \
         sense). Then answer with a JSON object containing exactly these fields:\n\
         - \"primary_audience\": one of \"students\", \"employees_faculty_staff\", \"mixed_other\"\n\
         - \"task_category\": one of \"registration\", \"financial_aid\", \"student_records\", \
         \"hr_benefits\", \"payroll\", \"procurement\", \"account_access\", \
         \"generic_system_reference\"\n\
         - \"reference_type\": one of \"action_portal\", \"informational_reference\", \
         \"historical_reference\"\n\
         - \"workday_feature\": short label for the Workday feature that replaces this usage\n\
         - \"proposed_replacement\": the snippet rewritten for Workday, preserving tone and \
         intent; do not invent URLs\n\
         - \"suggested_keywords\": 3 to 6 SEO keywords for the updated page\n\
         - \"confidence\": one of \"high\", \"medium\", \"low\"\n",
    );

    vec![ChatMessage::system(SYSTEM_CONTEXT), ChatMessage::user(user)]
}
