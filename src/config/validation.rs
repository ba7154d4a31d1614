use crate::config::types::{Config, FetcherConfig, OutputConfig, PaginationConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on extra attempts for a failed page fetch
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_pagination_config(&config.pagination)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search endpoint
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must not carry query parameters",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.fallback_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fallback_user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(position) = config.user_agents.iter().position(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "user_agents[{}] cannot be empty",
            position
        )));
    }

    Ok(())
}

/// Validates pagination configuration
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.retry_attempts > MAX_RETRY_ATTEMPTS {
        return Err(ConfigError::Validation(format!(
            "retry_attempts must be <= {}, got {}",
            MAX_RETRY_ATTEMPTS, config.retry_attempts
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
