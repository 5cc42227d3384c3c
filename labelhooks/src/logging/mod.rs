//! Structured logging built on tracing.
//!
//! Output format and level come from [`LoggingConfig`]; an explicit filter
//! directive (for example from a CLI flag or `RUST_LOG`) takes precedence
//! over the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),

    #[error("Subscriber error: {0}")]
    Subscriber(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Build the filter: `directive` wins, then `RUST_LOG`, then the configured level
pub fn build_filter(config: &LoggingConfig, directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => {
            EnvFilter::try_new(directive).map_err(|e| LogError::InvalidFilter(e.to_string()))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))),
    }
}

/// Initialize the global subscriber.
///
/// Stdout and the log file each get their own layer, so both receive every
/// event when both are configured. When a file is configured the returned
/// guard must be held for the lifetime of the process, otherwise buffered
/// lines are lost.
pub fn init(config: &LoggingConfig, directive: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(config, directive)?;
    let (layers, guard) = build_layers(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LogError::Subscriber(e.to_string()))?;
    Ok(guard)
}

/// One output layer per configured sink
fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers = Vec::new();
    if config.stdout {
        layers.push(fmt_layer(config.format, std::io::stdout, true));
    }

    let guard = match &config.file {
        Some(path) => {
            let (writer, guard) = create_non_blocking_file(path)?;
            layers.push(fmt_layer(config.format, writer, false));
            Some(guard)
        }
        None => None,
    };

    Ok((layers, guard))
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

fn create_non_blocking_file(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(directory) = directory {
        std::fs::create_dir_all(directory)?;
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| LogError::Subscriber(format!("not a file path: {}", path.display())))?;

    let appender =
        tracing_appender::rolling::never(directory.unwrap_or_else(|| Path::new(".")), file_name);
    Ok(tracing_appender::non_blocking(appender))
}
