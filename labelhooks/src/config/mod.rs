//! Configuration system for labelhooks.
//!
//! Configuration is layered with figment: built-in defaults, then an optional
//! file (TOML, YAML or JSON), then `LABELHOOKS_`-prefixed environment
//! variables. Nested keys are separated by `__`, e.g.
//! `LABELHOOKS_LOGGING__LEVEL=debug`.

mod loader;
mod models;
mod validation;

pub use loader::{ConfigLoader, FileFormat};
pub use models::*;
pub use validation::validate_config;

/// Default configuration file names that the loader will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "labelhooks.toml",
    "labelhooks.yaml",
    "labelhooks.yml",
    "labelhooks.json",
];

/// Environment variable prefix for labelhooks configuration
pub const ENV_PREFIX: &str = "LABELHOOKS_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
