// src/logging.rs

//! Logging setup for `csvforward` using `tracing` + `tracing-subscriber`.
//!
//! The filter is taken from, in order:
//! 1. `--log-level` on the command line
//! 2. `CSVFORWARD_LOG`, which accepts full `EnvFilter` directives such as
//!    `info,csvforward::tracker=debug`
//! 3. `info`
//!
//! Logs are sent to STDERR: in `tail` mode stdout carries the event stream
//! and must contain nothing else.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "CSVFORWARD_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))
}

/// Resolve the filter without installing it.
pub fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_str());
    }
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
