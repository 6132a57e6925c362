use serde::Deserialize;

/// Main configuration structure for relicscan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub hints: HintsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL (hard cap 5)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of URLs to record (hard cap 300)
    #[serde(rename = "max-urls", default = "default_max_urls")]
    pub max_urls: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum redirect hops a single fetch may follow
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Wall-clock ceiling for a whole scan or analyze operation, seconds
    #[serde(rename = "overall-timeout-secs", default = "default_overall_timeout")]
    pub overall_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_urls: default_max_urls(),
            request_timeout_secs: default_request_timeout(),
            max_redirects: default_max_redirects(),
            overall_timeout_secs: default_overall_timeout(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_urls() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_redirects() -> usize {
    5
}

fn default_overall_timeout() -> u64 {
    300
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scanner
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the scanner
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the scanner
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Email address for scanner-related contact
    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
            contact_email: default_contact_email(),
        }
    }
}

fn default_crawler_name() -> String {
    "Relicscan".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://example.edu/web-services".to_string()
}

fn default_contact_email() -> String {
    "webteam@example.edu".to_string()
}

/// Text-completion collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Model identifier to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature; kept low so classifications stay repeatable
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-call timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_model_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            request_timeout_secs: default_model_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_model_timeout() -> u64 {
    30
}

/// Reference detection configuration
///
/// The direct terms always produce a snippet. The ambiguous terms are
/// everyday words that double as legacy-system names; a hit only counts
/// when the surrounding character window contains one of the context
/// vocabulary entries.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Product names matched case-insensitively, tolerant of internal
    /// whitespace ("Cougar Web" and "CougarWeb" both match)
    #[serde(rename = "direct-terms", default = "default_direct_terms")]
    pub direct_terms: Vec<String>,

    /// Legacy-system names that are also ordinary English words
    #[serde(rename = "ambiguous-terms", default = "default_ambiguous_terms")]
    pub ambiguous_terms: Vec<String>,

    /// System/operational nouns that disambiguate an ambiguous term
    #[serde(rename = "context-vocabulary", default = "default_context_vocabulary")]
    pub context_vocabulary: Vec<String>,

    /// Characters inspected on each side of an ambiguous match
    #[serde(rename = "context-window-chars", default = "default_context_window")]
    pub context_window_chars: usize,

    /// Characters captured on each side of an accepted match
    #[serde(rename = "snippet-window-chars", default = "default_snippet_window")]
    pub snippet_window_chars: usize,

    /// Snippets shorter than this are discarded as trivial captures
    #[serde(rename = "min-snippet-chars", default = "default_min_snippet")]
    pub min_snippet_chars: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            direct_terms: default_direct_terms(),
            ambiguous_terms: default_ambiguous_terms(),
            context_vocabulary: default_context_vocabulary(),
            context_window_chars: default_context_window(),
            snippet_window_chars: default_snippet_window(),
            min_snippet_chars: default_min_snippet(),
        }
    }
}

fn default_direct_terms() -> Vec<String> {
    vec!["cougar web".to_string()]
}

fn default_ambiguous_terms() -> Vec<String> {
    vec!["colleague".to_string()]
}

fn default_context_vocabulary() -> Vec<String> {
    [
        "system",
        "erp",
        "ellucian",
        "datatel",
        "records",
        "registration",
        "register",
        "portal",
        "login",
        "log in",
        "database",
        "self-service",
        "student accounts",
        "human resources",
        "payroll",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_context_window() -> usize {
    150
}

fn default_snippet_window() -> usize {
    150
}

fn default_min_snippet() -> usize {
    20
}

/// Caller-supplied classification hints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HintsConfig {
    /// SEO keywords the rewritten copy should favor
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Organizational work-stream labels that bias classification
    #[serde(rename = "work-streams", default)]
    pub work_streams: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_urls, 100);
        assert!(!config.detection.direct_terms.is_empty());
        assert!(!config.detection.ambiguous_terms.is_empty());
        assert!(!config.detection.context_vocabulary.is_empty());
        assert!(config.hints.keywords.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model.temperature, 0.2);
        assert_eq!(config.crawler.overall_timeout_secs, 300);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
[crawler]
max-depth = 2
max-urls = 50

[detection]
ambiguous-terms = ["banner"]
"#,
        )
        .unwrap();
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.max_urls, 50);
        assert_eq!(config.detection.ambiguous_terms, vec!["banner"]);
        // Untouched sections keep their defaults
        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert_eq!(config.detection.context_window_chars, 150);
    }
}
