use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API key is present
/// - API and image base URLs are http(s)
/// - Timeouts and probe interval are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.api_key cannot be empty".to_string(),
        ));
    }

    check_http_url("api.base_url", &config.api.base_url)?;
    check_http_url("api.image_base_url", &config.api.image_base_url)?;

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.connectivity.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "connectivity.interval_secs cannot be 0".to_string(),
        ));
    }

    if config.connectivity.probe_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "connectivity.probe_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}
