use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// How `tail` drives the tracker.
///
/// - `Once`: a single pass over the data directory, then exit.
/// - `Continuous`: poll forever on a fixed interval until interrupted
///   (default behaviour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Once,
    Continuous,
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Continuous
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Once => f.write_str("once"),
            RunMode::Continuous => f.write_str("continuous"),
        }
    }
}

/// Scheme used to reach the HTTP Event Collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HecProtocol {
    Http,
    Https,
}

impl Default for HecProtocol {
    fn default() -> Self {
        HecProtocol::Http
    }
}

impl fmt::Display for HecProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HecProtocol::Http => f.write_str("http"),
            HecProtocol::Https => f.write_str("https"),
        }
    }
}
