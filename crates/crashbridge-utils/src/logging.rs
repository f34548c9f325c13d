//! # Logging Utilities
//!
//! Logging infrastructure for crashbridge using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Pretty (development) or JSON (production) output
//! - Filtering through `RUST_LOG`
//! - An optional log file next to the console output
//!
//! Console output goes to stderr so it never mixes with command output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crashbridge_utils::init_logging;
//!
//! // Keep the guard alive for as long as the program logs
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log filter (e.g. `RUST_LOG=debug`, `RUST_LOG=crashbridge_core=debug`)
//! - `CRASHBRIDGE_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `CRASHBRIDGE_LOG_FILE`: Optional log file. A file path rolls daily; a
//!   directory gets one `YYYY-MM-DD-crashbridge.log` per run date.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "CRASHBRIDGE_LOG_FORMAT";

/// Environment variable naming the optional log file.
pub const LOG_FILE_ENV: &str = "CRASHBRIDGE_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    #[default]
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'")),
        }
    }
}

/// Where and how to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig
{
    /// Output format for every layer
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `info` or `crashbridge_core=debug`
    pub filter: String,
    /// Optional log file or directory
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig
{
    fn default() -> Self
    {
        Self {
            format: LogFormat::Pretty,
            filter: Level::INFO.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig
{
    /// Read `RUST_LOG`, `CRASHBRIDGE_LOG_FORMAT` and `CRASHBRIDGE_LOG_FILE`.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InvalidFormat`] for an unknown format name.
    pub fn from_env() -> Result<Self, LoggingError>
    {
        let format = match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse().map_err(LoggingError::InvalidFormat)?,
            Err(_) => LogFormat::default(),
        };
        let filter = env::var("RUST_LOG").unwrap_or_else(|_| Level::INFO.to_string());
        let file = env::var_os(LOG_FILE_ENV).filter(|path| !path.is_empty()).map(PathBuf::from);

        Ok(Self { format, filter, file })
    }

    /// Replace the filter with a single level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self
    {
        self.filter = Level::from(level).to_string();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self
    {
        self.format = format;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError>
    {
        EnvFilter::try_new(&self.filter).map_err(|e| LoggingError::InvalidLevel(format!("{}: {e}", self.filter)))
    }
}

/// Keeps the background log file writer running. Drop it last.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LoggingGuard
{
    _file_writer: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// ## Example
///
/// ```rust,no_run
/// use crashbridge_utils::init_logging;
///
/// let _guard = init_logging().expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - An environment variable holds an invalid value
/// - The log file cannot be prepared
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    init_logging_with(LoggingConfig::from_env()?)
}

/// Initialize logging with explicit level and format
///
/// `CRASHBRIDGE_LOG_FILE` is still honoured.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let config = LoggingConfig::from_env().unwrap_or_default();
    init_logging_with(config.with_level(level).with_format(format))
}

/// Initialize logging from a [`LoggingConfig`]
///
/// ## Errors
///
/// Returns an error if the filter is invalid, the log file cannot be
/// prepared, or a global subscriber is already installed.
pub fn init_logging_with(config: LoggingConfig) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![console_layer(config.format, config.env_filter()?)];

    let file_writer = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            layers.push(file_layer(config.format, writer, config.env_filter()?));
            Some(guard)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Daily-rolling appender for a file path; a dated file for a directory.
fn file_appender(path: &Path) -> Result<tracing_appender::rolling::RollingFileAppender, LoggingError>
{
    if path.is_dir() {
        return Ok(tracing_appender::rolling::never(path, dated_file_name()));
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;
    let file_name = path.file_name().ok_or_else(|| LoggingError::InvalidFile(path.to_path_buf()))?;
    Ok(tracing_appender::rolling::daily(directory, file_name))
}

fn dated_file_name() -> String
{
    format!("{}-crashbridge.log", Utc::now().format("%Y-%m-%d"))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level or filter directive
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Log file path has no file name
    #[error("Invalid log file path: {}", .0.display())]
    InvalidFile(PathBuf),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("PROD").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_with_level_replaces_filter()
    {
        let config = LoggingConfig {
            filter: "crashbridge_core=trace".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.with_level(LogLevel::Warn).filter, "WARN");
    }

    #[test]
    fn test_invalid_filter_is_rejected()
    {
        let config = LoggingConfig {
            filter: "crashbridge_core=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(config.env_filter(), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_dated_file_name()
    {
        let name = dated_file_name();
        assert!(name.ends_with("-crashbridge.log"));
        assert_eq!(name.len(), "YYYY-MM-DD-crashbridge.log".len());
    }
}
