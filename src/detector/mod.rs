//! Reference detection for legacy-system mentions
//!
//! Two independent rules run over the tag-stripped page text:
//!
//! 1. Direct rule - a case-insensitive match on a product name, tolerant
//!    of internal whitespace ("CougarWeb" / "Cougar Web"). Always emits.
//! 2. Disambiguation rule - a common English word that doubles as a
//!    legacy-system name ("colleague"). A raw match counts only when a
//!    fixed-size character window around it also contains one of a small
//!    vocabulary of system/operational nouns. The test trades recall for
//!    precision: the word's ordinary conversational sense is deliberately
//!    ignored.

use crate::config::DetectionConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A bounded context window around one detected legacy-term occurrence
///
/// Ephemeral: produced and consumed within a single analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSnippet {
    /// Page the snippet came from (canonical URL)
    pub source_url: String,

    /// Whitespace-collapsed context text, bounded length
    pub text: String,

    /// The legacy term that matched
    pub matched_term: String,
}

/// Finds legacy-system references in raw page markup
///
/// The markup is tag-stripped first; matching never runs against script
/// or style content. Accepted matches expand to bounded, collapsed,
/// trimmed snippets; trivial captures below the minimum length are
/// dropped and duplicates (by exact snippet text) are emitted once.
pub fn detect(
    source_url: &str,
    page_markup: &str,
    config: &DetectionConfig,
) -> Vec<ReferenceSnippet> {
    let text = strip_markup(page_markup);
    let mut snippets: Vec<ReferenceSnippet> = Vec::new();

    for term in &config.direct_terms {
        let Ok(re) = direct_term_regex(term) else {
            tracing::warn!("Skipping unusable direct term '{}'", term);
            continue;
        };
        for m in re.find_iter(&text) {
            push_snippet(source_url, &text, m.start(), m.end(), term, config, &mut snippets);
        }
    }

    for term in &config.ambiguous_terms {
        let Ok(re) = ambiguous_term_regex(term) else {
            tracing::warn!("Skipping unusable ambiguous term '{}'", term);
            continue;
        };
        for m in re.find_iter(&text) {
            if !window_has_context(&text, m.start(), m.end(), config) {
                continue;
            }
            push_snippet(source_url, &text, m.start(), m.end(), term, config, &mut snippets);
        }
    }

    snippets
}

fn title_regex() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid")
    })
}

fn block_regexes() -> &'static [Regex; 3] {
    static BLOCKS: OnceLock<[Regex; 3]> = OnceLock::new();
    BLOCKS.get_or_init(|| {
        [
            Regex::new(r"(?is)<script\b.*?</script>").expect("script regex is valid"),
            Regex::new(r"(?is)<style\b.*?</style>").expect("style regex is valid"),
            Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"),
        ]
    })
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"))
}

/// Extracts the page title from raw markup, if any
pub fn extract_title(page_markup: &str) -> Option<String> {
    let inner = title_regex().captures(page_markup)?.get(1)?.as_str();
    let title = collapse_whitespace(&strip_tags(inner));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Reduces raw markup to plain text: script/style/comment blocks removed,
/// tags removed, whitespace collapsed. Deliberately not DOM-accurate.
pub fn strip_markup(page_markup: &str) -> String {
    let mut text = page_markup.to_string();
    for re in block_regexes() {
        text = re.replace_all(&text, " ").to_string();
    }
    collapse_whitespace(&strip_tags(&text))
}

fn strip_tags(markup: &str) -> String {
    tag_regex().replace_all(markup, " ").to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-tolerant regex for a product name: internal spaces match
/// zero or more whitespace characters, so "Cougar Web" and "CougarWeb"
/// both hit.
fn direct_term_regex(term: &str) -> Result<Regex, regex::Error> {
    let parts: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    Regex::new(&format!("(?i){}", parts.join(r"\s*")))
}

/// Whole-word regex for an ambiguous term ("colleague" must not match
/// inside an unrelated longer word).
fn ambiguous_term_regex(term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term.trim())))
}

/// Checks the fixed-size character window around a raw ambiguous match
/// for at least one disambiguation noun.
fn window_has_context(text: &str, start: usize, end: usize, config: &DetectionConfig) -> bool {
    let lo = floor_boundary(text, start.saturating_sub(config.context_window_chars));
    let hi = ceil_boundary(text, (end + config.context_window_chars).min(text.len()));
    let window = text[lo..hi].to_lowercase();

    config
        .context_vocabulary
        .iter()
        .any(|noun| window.contains(&noun.to_lowercase()))
}

fn push_snippet(
    source_url: &str,
    text: &str,
    start: usize,
    end: usize,
    term: &str,
    config: &DetectionConfig,
    snippets: &mut Vec<ReferenceSnippet>,
) {
    let lo = floor_boundary(text, start.saturating_sub(config.snippet_window_chars));
    let hi = ceil_boundary(text, (end + config.snippet_window_chars).min(text.len()));
    let snippet_text = collapse_whitespace(&text[lo..hi]);

    if snippet_text.len() < config.min_snippet_chars {
        return;
    }
    if snippets.iter().any(|s| s.text == snippet_text) {
        return;
    }

    snippets.push(ReferenceSnippet {
        source_url: source_url.to_string(),
        text: snippet_text,
        matched_term: term.to_string(),
    });
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;

    fn config() -> DetectionConfig {
        DetectionConfig::default()
    }

    fn detect_text(text: &str) -> Vec<ReferenceSnippet> {
        detect("https://example.edu/page", text, &config())
    }

    #[test]
    fn test_direct_one_word_spelling() {
        let snippets =
            detect_text("Log in to CougarWeb to view your class schedule and grades online.");
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].matched_term, "cougar web");
    }

    #[test]
    fn test_direct_two_word_spelling() {
        let snippets =
            detect_text("Log in to Cougar Web to view your class schedule and grades online.");
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_direct_mixed_case() {
        let snippets =
            detect_text("Visit COUGARWEB for registration details and payment deadlines today.");
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_bare_colleague_rejected() {
        // Ordinary conversational sense, no system vocabulary nearby
        let snippets =
            detect_text("Ask a trusted colleague to review your draft before the meeting.");
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_colleague_near_student_records_accepted_once() {
        let snippets = detect_text(
            "Grades are entered in Colleague, the student records system used by the registrar.",
        );
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].matched_term, "colleague");
    }

    #[test]
    fn test_colleague_outside_window_rejected() {
        let mut cfg = config();
        cfg.context_window_chars = 10;
        let text =
            "Thank your colleague for the help. Much later in the page we discuss the records system.";
        let snippets = detect("https://example.edu/p", text, &cfg);
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_colleagues_plural_not_matched() {
        let snippets =
            detect_text("Our colleagues maintain the portal login system for the whole campus.");
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_snippet_whitespace_collapsed() {
        let snippets = detect_text("Use   CougarWeb\n\n  to   register   for   classes   today.");
        assert_eq!(snippets.len(), 1);
        assert!(!snippets[0].text.contains("  "));
    }

    #[test]
    fn test_trivial_capture_dropped() {
        let mut cfg = config();
        cfg.snippet_window_chars = 2;
        // Captured context is far below the 20-char minimum
        let snippets = detect("https://example.edu/p", "CougarWeb", &cfg);
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_duplicate_snippets_deduplicated() {
        let mut cfg = config();
        cfg.snippet_window_chars = 500;
        // Both matches expand to the same full-text snippet
        let text = "CougarWeb here and CougarWeb there, register for classes online.";
        let snippets = detect("https://example.edu/p", text, &cfg);
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_detection_skips_script_blocks() {
        let markup = r#"<html><body>
            <script>var cougarweb = "registration system";</script>
            <p>Nothing legacy in the visible copy of this page at all.</p>
        </body></html>"#;
        let snippets = detect("https://example.edu/p", markup, &config());
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_detection_inside_markup() {
        let markup = r#"<p>Log in to <strong>Cougar Web</strong> to register for classes.</p>"#;
        let snippets = detect("https://example.edu/p", markup, &config());
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_extract_title() {
        let markup = "<html><head><title>  Registrar &amp; Records </title></head></html>";
        assert_eq!(
            extract_title(markup),
            Some("Registrar &amp; Records".to_string())
        );
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
    }

    #[test]
    fn test_strip_markup_collapses() {
        let markup = "<div><p>one</p>\n<p>two</p></div>";
        assert_eq!(strip_markup(markup), "one two");
    }
}
