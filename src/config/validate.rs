//! Configuration validation.

use crate::config::Config;
use crate::constants::{confidence, upstream};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_classification(config)?;
    validate_upstream(config)?;
    Ok(())
}

/// Validate classification settings.
fn validate_classification(config: &Config) -> Result<()> {
    let classification = &config.classification;

    if !(confidence::MIN..=confidence::MAX).contains(&classification.threshold) {
        return Err(Error::ConfigValidation {
            message: format!(
                "threshold must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                classification.threshold
            ),
        });
    }

    if classification.top_k == 0 {
        return Err(Error::ConfigValidation {
            message: "top_k must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate upstream provider settings.
fn validate_upstream(config: &Config) -> Result<()> {
    let settings = &config.upstream;

    if settings.timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            message: "timeout_secs must be at least 1".to_string(),
        });
    }

    if settings.max_output_tokens == 0 {
        return Err(Error::ConfigValidation {
            message: "max_output_tokens must be at least 1".to_string(),
        });
    }

    if !(0.0..=upstream::MAX_TEMPERATURE).contains(&settings.temperature) {
        return Err(Error::ConfigValidation {
            message: format!(
                "temperature must be between 0 and {}, got {}",
                upstream::MAX_TEMPERATURE,
                settings.temperature
            ),
        });
    }

    if let Some(endpoint) = settings.endpoint.as_deref()
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        return Err(Error::ConfigValidation {
            message: format!("endpoint must be an http(s) URL, got '{endpoint}'"),
        });
    }

    Ok(())
}
