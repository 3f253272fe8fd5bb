//! Logging configuration and initialization
//!
//! One place to configure tracing for every imece binary. Library crates only
//! emit events through the `tracing` macros; a binary calls [`init_logging`]
//! exactly once at startup.
//!
//! Configuration sources, in precedence order:
//!
//! 1. `IMECE_LOG_*` environment variables (see [`LogConfig::from_env`])
//! 2. values set through the `with_*` methods
//! 3. defaults (info level, text format, console output)
//!
//! # Example
//!
//! ```no_run
//! use imece_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! let config = LogConfig::default()
//!     .with_level(LogLevel::Debug)
//!     .with_file_prefix("imece-ingest");
//! init_logging(&config).unwrap();
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Minimum level to record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            other => anyhow::bail!("unrecognized log level {other:?}"),
        })
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Where log lines go
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

impl FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Self::Console,
            "file" => Self::File,
            "both" | "all" => Self::Both,
            other => anyhow::bail!("unrecognized log output {other:?}"),
        })
    }
}

/// Line format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Self::Text,
            "json" => Self::Json,
            other => anyhow::bail!("unrecognized log format {other:?}"),
        })
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level to record
    pub level: LogLevel,

    /// Output target
    pub output: LogOutput,

    /// Line format (text or JSON)
    pub format: LogFormat,

    /// Directory that receives rolled log files
    pub log_dir: PathBuf,

    /// File name prefix, e.g. "imece-ingest" rolls to "imece-ingest.2026-08-25.log"
    pub file_prefix: String,

    /// Extra filter directives on top of the base level, e.g. "sqlx=warn"
    pub directives: Option<String>,

    /// Record the file and line of the emitting call site
    pub show_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: LogOutput::default(),
            format: LogFormat::default(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "imece".to_string(),
            directives: None,
            show_location: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from `IMECE_LOG_*` environment variables
    ///
    /// Unset or empty variables keep their defaults; values that fail to
    /// parse are reported as errors rather than silently ignored.
    ///
    /// - `IMECE_LOG_LEVEL`: trace | debug | info | warn | error
    /// - `IMECE_LOG_OUTPUT`: console | file | both
    /// - `IMECE_LOG_FORMAT`: text | json
    /// - `IMECE_LOG_DIR`: log file directory
    /// - `IMECE_LOG_FILE_PREFIX`: log file name prefix
    /// - `IMECE_LOG_FILTER`: extra filter directives
    /// - `IMECE_LOG_LOCATION`: true | false
    pub fn from_env() -> Result<Self> {
        fn var(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|v| !v.trim().is_empty())
        }

        let mut config = Self::default();
        if let Some(raw) = var("IMECE_LOG_LEVEL") {
            config.level = raw.parse()?;
        }
        if let Some(raw) = var("IMECE_LOG_OUTPUT") {
            config.output = raw.parse()?;
        }
        if let Some(raw) = var("IMECE_LOG_FORMAT") {
            config.format = raw.parse()?;
        }
        if let Some(raw) = var("IMECE_LOG_DIR") {
            config.log_dir = raw.into();
        }
        if let Some(raw) = var("IMECE_LOG_FILE_PREFIX") {
            config.file_prefix = raw;
        }
        if let Some(raw) = var("IMECE_LOG_FILTER") {
            config.directives = Some(raw);
        }
        if let Some(raw) = var("IMECE_LOG_LOCATION") {
            config.show_location = raw
                .parse()
                .context("IMECE_LOG_LOCATION must be true or false")?;
        }
        Ok(config)
    }

    /// Override the minimum level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Override the output target
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Override the line format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the log file directory
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Override the log file name prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Add extra filter directives, e.g. "sqlx=warn,imece_ingest=debug"
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Record call-site file and line on every event
    pub fn with_location(mut self, show: bool) -> Self {
        self.show_location = show;
        self
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global tracing subscriber
///
/// Call once at startup; a second call returns an error from the underlying
/// registry rather than silently replacing the subscriber.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    match config.output {
        LogOutput::Console => layers.push(console_layer(config)),
        LogOutput::File => layers.push(file_layer(config)?),
        LogOutput::Both => {
            layers.push(console_layer(config));
            layers.push(file_layer(config)?);
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(build_filter(config)?)
        .try_init()?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level; extra directives stack on top.
fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    let base = LevelFilter::from_level(config.level.into());
    let mut filter = EnvFilter::builder()
        .with_default_directive(base.into())
        .from_env()
        .context("invalid RUST_LOG filter")?;

    if let Some(raw) = &config.directives {
        for directive in raw.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            filter = filter.add_directive(
                directive
                    .parse()
                    .with_context(|| format!("bad log filter directive {directive:?}"))?,
            );
        }
    }
    Ok(filter)
}

fn console_layer(config: &LogConfig) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(std::io::stdout)
        .with_file(config.show_location)
        .with_line_number(config.show_location)
        .with_span_events(FmtSpan::CLOSE);

    match config.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base.boxed(),
    }
}

fn file_layer(config: &LogConfig) -> Result<BoxedLayer> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_prefix.as_str())
        .filename_suffix("log")
        .build(&config.log_dir)
        .with_context(|| format!("cannot open log directory {}", config.log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The guard must outlive the subscriber; leak it for the process lifetime.
    std::mem::forget(guard);

    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(config.show_location)
        .with_line_number(config.show_location)
        .with_span_events(FmtSpan::CLOSE);

    Ok(match config.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base.boxed(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_aliases() {
        for (raw, want) in [
            ("trace", LogLevel::Trace),
            ("DEBUG", LogLevel::Debug),
            ("Info", LogLevel::Info),
            ("warning", LogLevel::Warn),
            (" error ", LogLevel::Error),
        ] {
            assert_eq!(raw.parse::<LogLevel>().unwrap(), want, "input {raw:?}");
        }
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_parse_output_and_format_aliases() {
        assert_eq!("stdout".parse::<LogOutput>().unwrap(), LogOutput::Console);
        assert_eq!("all".parse::<LogOutput>().unwrap(), LogOutput::Both);
        assert!("syslog".parse::<LogOutput>().is_err());

        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_display_round_trips_through_parse() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_level_converts_to_tracing() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::default()), Level::INFO);
    }

    #[test]
    fn test_from_env_location_must_be_bool() {
        std::env::set_var("IMECE_LOG_LOCATION", "true");
        let accepted = LogConfig::from_env();
        std::env::set_var("IMECE_LOG_LOCATION", "maybe");
        let rejected = LogConfig::from_env();
        std::env::remove_var("IMECE_LOG_LOCATION");

        assert!(accepted.unwrap().show_location);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_with_methods_override_defaults() {
        let config = LogConfig::default()
            .with_level(LogLevel::Trace)
            .with_output(LogOutput::Both)
            .with_format(LogFormat::Json)
            .with_log_dir("/tmp/imece-logs")
            .with_file_prefix("pipeline")
            .with_directives("sqlx=warn")
            .with_location(true);

        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.output, LogOutput::Both);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/imece-logs"));
        assert_eq!(config.file_prefix, "pipeline");
        assert_eq!(config.directives.as_deref(), Some("sqlx=warn"));
        assert!(config.show_location);
    }
}
