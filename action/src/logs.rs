//! Logging configuration

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::DeployerError;
use crate::github::action::Action;

/// Log level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Logging options
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Log level
    pub log_level: LogLevel,

    /// Enable JSON format
    pub json_format: bool,
}

impl LogOptions {
    /// Options for a workflow step. A debug re-run (`RUNNER_DEBUG=1`) turns on
    /// debug logs; `APP_ACTION_LOG_LEVEL` and `APP_ACTION_LOG_FORMAT=json`
    /// override.
    pub fn from_action(action: &Action) -> Self {
        let mut options = Self::default();
        if action.getenv("RUNNER_DEBUG").as_deref() == Some("1") {
            options.log_level = LogLevel::Debug;
        }
        if let Some(level) = action
            .getenv("APP_ACTION_LOG_LEVEL")
            .and_then(|l| l.parse().ok())
        {
            options.log_level = level;
        }
        options.json_format = action
            .getenv("APP_ACTION_LOG_FORMAT")
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));
        options
    }
}

/// Initialize logging. Diagnostics go to stderr; stdout carries workflow
/// commands.
pub fn init_logging(options: LogOptions) -> Result<(), DeployerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_level.to_filter_string()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if options.json_format {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| DeployerError::Internal(e.to_string()))?;
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| DeployerError::Internal(e.to_string()))?;
    }

    Ok(())
}
