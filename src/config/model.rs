// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{HecProtocol, RunMode};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [tail]
/// data_dir = "data"
/// state_dir = "state"
/// poll_interval = 10
/// mode = "continuous"
///
/// [convert]
/// output_dir = "json_output"
/// index = "main"
///
/// [hec]
/// host = "splunk.local"
/// token = "..."
/// ```
///
/// All sections are optional and have reasonable defaults. Leaving out
/// `[hec]` disables posting to the event collector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub tail: TailSection,

    #[serde(default)]
    pub convert: ConvertSection,

    #[serde(default)]
    pub hec: Option<HecSection>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub tail: TailSection,
    pub convert: ConvertSection,
    pub hec: Option<HecSection>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        tail: TailSection,
        convert: ConvertSection,
        hec: Option<HecSection>,
    ) -> Self {
        Self { tail, convert, hec }
    }
}

/// `[tail]` section: the incremental tracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailSection {
    /// Directory scanned for CSV files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding `csv_state.json`.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Seconds between passes in continuous mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Event-category label attached to every event.
    #[serde(default = "default_sourcetype")]
    pub sourcetype: String,

    #[serde(default)]
    pub mode: RunMode,

    /// File extension (without the dot) of candidate files.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for TailSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_dir: default_state_dir(),
            poll_interval: default_poll_interval(),
            sourcetype: default_sourcetype(),
            mode: RunMode::default(),
            extension: default_extension(),
        }
    }
}

/// `[convert]` section: the batch converter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory receiving one `<stem>.json` per CSV file.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_sourcetype")]
    pub sourcetype: String,

    /// Value of the `host` field on converted events.
    #[serde(default = "default_event_host")]
    pub host: String,

    /// Target index written into every converted event.
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            sourcetype: default_sourcetype(),
            host: default_event_host(),
            index: default_index(),
            extension: default_extension(),
        }
    }
}

/// `[hec]` section: HTTP Event Collector endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HecSection {
    pub host: String,

    #[serde(default = "default_hec_port")]
    pub port: u16,

    pub token: String,

    #[serde(default)]
    pub protocol: HecProtocol,

    /// Verify the server certificate when `protocol = "https"`.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Events per request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HecSection {
    /// A section with defaults for everything but the endpoint and token.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_hec_port(),
            token: token.into(),
            protocol: HecProtocol::default(),
            verify_tls: default_verify_tls(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("json_output")
}

fn default_poll_interval() -> u64 {
    10
}

fn default_sourcetype() -> String {
    "csv_data".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_event_host() -> String {
    "csv-converter".to_string()
}

fn default_index() -> String {
    "main".to_string()
}

fn default_hec_port() -> u16 {
    8088
}

fn default_verify_tls() -> bool {
    true
}

fn default_batch_size() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}
