use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the worker count, shared with the `--workers` CLI override
pub fn validate_workers(workers: u32) -> ConfigResult<()> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.detail_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "detail-path cannot be empty".to_string(),
        ));
    }

    if config.excluded_marker.is_empty() {
        return Err(ConfigError::Validation(
            "excluded-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    validate_workers(config.workers)?;

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, '-' or '_', got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    let name = &config.manifest_name;
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "manifest-name must be a plain file name, got '{}'",
            name
        )));
    }
    Ok(())
}
