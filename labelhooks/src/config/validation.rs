//! Configuration validation

use super::{ConfigError, LabelhooksConfig, Result};

/// Check a loaded configuration for values the service cannot run with
pub fn validate_config(config: &LabelhooksConfig) -> Result<()> {
    let base_url = &config.api.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must start with http:// or https://, got '{}'",
            base_url
        )));
    }

    if !config.logging.stdout && config.logging.file.is_none() {
        return Err(ConfigError::ValidationError(
            "logging needs at least one output: enable stdout or set a file".to_string(),
        ));
    }

    Ok(())
}
