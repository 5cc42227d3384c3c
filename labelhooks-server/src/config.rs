//! Server configuration module

use anyhow::{Context, Result};
use labelhooks::config::LabelhooksConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crate::cli::CliArgs;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// Library configuration file
    pub config_file: Option<PathBuf>,

    /// Library configuration (API base URL, logging)
    pub labelhooks: LabelhooksConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_size: 2 * 1024 * 1024, // 2MB
            config_file: None,
            labelhooks: LabelhooksConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = cli_args.host {
            config.host = host;
        } else if let Ok(host) = env::var("LABELHOOKS_HOST") {
            config.host = host;
        }

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("LABELHOOKS_PORT") {
            config.port = port.parse().context("LABELHOOKS_PORT is not a valid port")?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Ok(max_size) = env::var("LABELHOOKS_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size
                .parse()
                .context("LABELHOOKS_MAX_REQUEST_SIZE is not a number")?;
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file = Some(config_path);
        } else if let Ok(config_path) = env::var("LABELHOOKS_CONFIG_FILE") {
            config.config_file = Some(PathBuf::from(config_path));
        }

        config.labelhooks = LabelhooksConfig::load(config.config_file.as_deref())?;

        if let Some(base_url) = cli_args.base_url {
            config.labelhooks.api.base_url = base_url;
            labelhooks::config::validate_config(&config.labelhooks)?;
        }

        Ok(config)
    }

    /// Bind the listener. `host` may be an IP address or a resolvable hostname.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", self.host, self.port))
    }
}
