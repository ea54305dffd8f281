//! Subscriber setup for binaries and tests embedding the crate.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! the host calls [`init_logging`] (or installs its own subscriber).

use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::env::logging as env_vars;
use crate::error::{RecallError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `chat_recall=debug,lancedb=warn`.
    pub filter: String,
    pub stdout: bool,
    pub file_path: Option<PathBuf>,
    pub format: LogFormat,
    pub use_colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            // LanceDB and its object store are chatty at info.
            filter: "info,lance=warn,lancedb=warn".to_string(),
            stdout: true,
            file_path: None,
            format: LogFormat::Pretty,
            use_colors: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = directive.into();
        self
    }

    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.stdout = enabled;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    /// Defaults overridden by `CHAT_RECALL_LOG_LEVEL`, `CHAT_RECALL_LOG_FILE`
    /// and `NO_COLOR`. Logging to a file switches stdout off.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(directive) = env::var(env_vars::LOG_LEVEL) {
            if !directive.trim().is_empty() {
                config.filter = directive;
            }
        }

        if let Ok(path) = env::var(env_vars::LOG_FILE) {
            config.file_path = Some(PathBuf::from(path));
            config.stdout = false;
        }

        if env::var_os(env_vars::NO_COLOR).is_some() {
            config.use_colors = false;
        }

        config
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.filter).map_err(|e| {
            RecallError::invalid_config(format!("bad log filter '{}': {e}", self.filter))
        })
    }
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn format_layer<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_target(true);
    match format {
        LogFormat::Pretty => layer.with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().with_ansi(false).boxed(),
    }
}

fn file_writer(path: &Path) -> Result<tracing_appender::rolling::RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| RecallError::invalid_config("log file path has no file name"))?;

    std::fs::create_dir_all(&directory)?;
    Ok(tracing_appender::rolling::never(directory, file_name))
}

/// Install the global subscriber. Fails on a bad filter directive, an
/// unusable log file path, or when a subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = config.env_filter()?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.stdout {
        layers.push(format_layer(std::io::stdout, config.format, config.use_colors));
    }
    if let Some(path) = &config.file_path {
        layers.push(format_layer(file_writer(path)?, config.format, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| RecallError::Unknown {
            message: format!("Failed to initialize logging: {e}"),
        })?;

    tracing::debug!(
        filter = %config.filter,
        stdout = config.stdout,
        file = ?config.file_path,
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}

pub fn init_from_env() -> Result<()> {
    init_logging(LoggingConfig::from_env())
}
