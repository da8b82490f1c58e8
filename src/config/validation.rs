use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use std::collections::BTreeMap;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any request is made; every problem found here is fatal.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_brand_table(&config.brands)?;
    Ok(())
}

/// Validates the catalog location and listing roots
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.base_url.trim().is_empty() {
        return Err(ConfigError::InvalidUrl(
            "base-url is required (config file or --base-url)".to_string(),
        ));
    }

    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.listing_paths.is_empty() {
        return Err(ConfigError::Validation(
            "listing-paths must name at least one listing root".to_string(),
        ));
    }

    for path in &config.listing_paths {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "listing-paths cannot contain an empty entry".to_string(),
            ));
        }
        base.join(path).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid listing path '{}': {}", path, e))
        })?;
    }

    if !config.product_path_marker.starts_with('/') || config.product_path_marker.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "product-path-marker must be a path fragment like '/product/', got '{}'",
            config.product_path_marker
        )));
    }

    Ok(())
}

/// Validates crawl limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.stop_after_empty_pages < 1 || config.stop_after_empty_pages > config.max_pages {
        return Err(ConfigError::Validation(format!(
            "stop-after-empty-pages must be between 1 and max-pages ({}), got {}",
            config.max_pages, config.stop_after_empty_pages
        )));
    }

    if config.max_products == Some(0) {
        return Err(ConfigError::Validation(
            "max-products must be >= 1 when set".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.json_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "json-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category -> brand lookup table
fn validate_brand_table(brands: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    for (category, brand) in brands {
        if category.trim().is_empty() || brand.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand table entries need a category and a brand, got '{}' = '{}'",
                category, brand
            )));
        }
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
