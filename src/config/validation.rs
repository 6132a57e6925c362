use crate::config::types::{
    Config, CrawlerConfig, DetectionConfig, ModelConfig, UserAgentConfig,
};
use crate::crawler::{MAX_DEPTH_CAP, MAX_URLS_CAP};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_model_config(&config.model)?;
    validate_detection_config(&config.detection)?;
    Ok(())
}

/// Validates crawler configuration against the operation caps
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth > MAX_DEPTH_CAP {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_CAP, config.max_depth
        )));
    }

    if config.max_urls == 0 || config.max_urls > MAX_URLS_CAP {
        return Err(ConfigError::Validation(format!(
            "max_urls must be between 1 and {}, got {}",
            MAX_URLS_CAP, config.max_urls
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.overall_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "overall_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    if !config.contact_email.contains('@') {
        return Err(ConfigError::Validation(format!(
            "contact_email must contain '@', got '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

/// Validates completion model configuration
fn validate_model_config(config: &ModelConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid model base_url: {}", e)))?;

    if config.model.is_empty() {
        return Err(ConfigError::Validation(
            "model identifier cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    Ok(())
}

/// Validates detection configuration
fn validate_detection_config(config: &DetectionConfig) -> Result<(), ConfigError> {
    if config.direct_terms.is_empty() && config.ambiguous_terms.is_empty() {
        return Err(ConfigError::Validation(
            "at least one direct or ambiguous term is required".to_string(),
        ));
    }

    if config.direct_terms.iter().any(|t| t.trim().is_empty())
        || config.ambiguous_terms.iter().any(|t| t.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "detection terms cannot be blank".to_string(),
        ));
    }

    if !config.ambiguous_terms.is_empty() && config.context_vocabulary.is_empty() {
        return Err(ConfigError::Validation(
            "ambiguous terms require a non-empty context vocabulary".to_string(),
        ));
    }

    if config.context_window_chars == 0 || config.snippet_window_chars == 0 {
        return Err(ConfigError::Validation(
            "context and snippet windows must be >= 1 character".to_string(),
        ));
    }

    if config.min_snippet_chars > config.snippet_window_chars {
        return Err(ConfigError::Validation(format!(
            "min_snippet_chars ({}) cannot exceed snippet_window_chars ({})",
            config.min_snippet_chars, config.snippet_window_chars
        )));
    }

    Ok(())
}
