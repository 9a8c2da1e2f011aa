// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option is optional so that unset values fall through to the config
//! file; environment variables are read by clap itself (`env` feature).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{HecProtocol, RunMode};

/// Command-line arguments for `csvforward`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csvforward",
    version,
    about = "Forward CSV rows to a log indexer as JSON events.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Csvforward.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CSVFORWARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't process any files.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Emit new CSV rows as JSON lines on stdout, remembering progress.
    Tail(TailArgs),
    /// Convert CSV files to JSON files and optionally post them to HEC.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct TailArgs {
    /// Directory to monitor for CSV files.
    #[arg(long, env = "CSV_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory to store `csv_state.json` in.
    #[arg(long, env = "CSV_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Seconds between passes in continuous mode.
    #[arg(long, env = "CSV_POLL_INTERVAL", value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Sourcetype attached to every event.
    #[arg(long, env = "CSV_SOURCETYPE")]
    pub sourcetype: Option<String>,

    /// `once` or `continuous`.
    #[arg(long, value_enum, ignore_case = true, env = "CSV_RUN_MODE")]
    pub mode: Option<RunMode>,

    /// Shorthand for `--mode once`.
    #[arg(long)]
    pub once: bool,

    /// Extension of candidate files, without the dot.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConvertArgs {
    /// Directory containing CSV files.
    #[arg(long, env = "DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory to save JSON files.
    #[arg(long, env = "OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub sourcetype: Option<String>,

    /// Value of the `host` field on each event.
    #[arg(long, value_name = "NAME")]
    pub event_host: Option<String>,

    /// Target index name.
    #[arg(long, env = "SPLUNK_INDEX")]
    pub index: Option<String>,

    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// HEC server hostname or IP. Posting is disabled unless set.
    #[arg(long, env = "SPLUNK_HOST", value_name = "HOST")]
    pub hec_host: Option<String>,

    /// HEC port.
    #[arg(long, env = "SPLUNK_PORT", value_name = "PORT")]
    pub hec_port: Option<u16>,

    /// HEC token.
    #[arg(long, env = "SPLUNK_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub hec_token: Option<String>,

    #[arg(long, value_enum, ignore_case = true, env = "SPLUNK_PROTOCOL")]
    pub protocol: Option<HecProtocol>,

    /// Skip TLS certificate verification for https.
    #[arg(long)]
    pub insecure: bool,

    /// Events per HEC request.
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
