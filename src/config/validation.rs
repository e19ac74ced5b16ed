use crate::config::types::{Config, OutputConfig, ProbeConfig, SourceConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the per-link timeout
const MAX_TIMEOUT_SECONDS: f64 = 300.0;

/// Upper bound on probes in flight
const MAX_CONCURRENCY: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_probe_config(&config.probe)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates probe configuration
fn validate_probe_config(config: &ProbeConfig) -> ConfigResult<()> {
    if !(config.timeout_seconds > 0.0 && config.timeout_seconds <= MAX_TIMEOUT_SECONDS) {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be in (0, {}], got {}",
            MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    if config.concurrency_limit < 1 || config.concurrency_limit > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency_limit
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates playlist source configuration
fn validate_source_config(config: &SourceConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.playlist_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid playlist_url '{}': {}",
            config.playlist_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "playlist_url '{}' must use HTTP or HTTPS",
            config.playlist_url
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "max_retries must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    for (key, value) in [
        ("directory", &config.directory),
        ("csv_file", &config.csv_file),
        ("text_file", &config.text_file),
        ("m3u_file", &config.m3u_file),
        ("available_m3u_file", &config.available_m3u_file),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    Ok(())
}
