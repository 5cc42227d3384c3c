//! Layered configuration sources.
//!
//! Layers merge in call order, later ones winning: built-in defaults, a
//! configuration file, then environment variables.

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, LabelhooksConfig, Result, validation};
use figment::{
    Figment, Provider,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// Configuration file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(FileFormat::Toml),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Builder over a figment with the defaults as its base layer
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
    source: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(LabelhooksConfig::default())),
            source: None,
        }
    }

    /// Merge an explicitly requested file. A missing file or an unknown
    /// extension is an error.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let format = FileFormat::from_path(path).ok_or_else(|| {
            ConfigError::FileLoadError(format!("Unsupported file format: {}", path.display()))
        })?;
        Ok(self.merge_file(path, format))
    }

    /// Merge the first of [`DEFAULT_CONFIG_FILES`] present in `dir`, if any
    pub fn with_default_file(self, dir: impl AsRef<Path>) -> Self {
        let found = DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .filter(|path| path.is_file())
            .find_map(|path| FileFormat::from_path(&path).map(|format| (path, format)));

        match found {
            Some((path, format)) => self.merge_file(&path, format),
            None => self,
        }
    }

    /// Merge `LABELHOOKS_`-prefixed variables; `__` separates nested keys
    pub fn with_env(self) -> Self {
        self.with_provider(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn with_provider(mut self, provider: impl Provider) -> Self {
        self.figment = self.figment.merge(provider);
        self
    }

    /// The file merged into this loader, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Extract and validate the configuration
    pub fn extract(&self) -> Result<LabelhooksConfig> {
        let config: LabelhooksConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;
        Ok(config)
    }

    fn merge_file(mut self, path: &Path, format: FileFormat) -> Self {
        self.figment = match format {
            FileFormat::Toml => self.figment.merge(Toml::file(path)),
            FileFormat::Yaml => self.figment.merge(Yaml::file(path)),
            FileFormat::Json => self.figment.merge(Json::file(path)),
        };
        self.source = Some(path.to_path_buf());
        self
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelhooksConfig {
    /// Defaults, then `file` (or the first default file in the working
    /// directory when `None`), then the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let loader = match file {
            Some(path) => ConfigLoader::new().with_file(path)?,
            None => ConfigLoader::new().with_default_file("."),
        };
        loader.with_env().extract()
    }
}
