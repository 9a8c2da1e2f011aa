// src/config/validate.rs

use crate::config::model::{
    ConfigFile, ConvertSection, HecSection, RawConfigFile, TailSection,
};
use crate::errors::{ForwardError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ForwardError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.tail, raw.convert, raw.hec))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_tail(&cfg.tail)?;
    validate_convert(&cfg.convert)?;
    if let Some(hec) = &cfg.hec {
        validate_hec(hec)?;
    }
    Ok(())
}

fn validate_tail(tail: &TailSection) -> Result<()> {
    if tail.poll_interval == 0 {
        return Err(ForwardError::ConfigError(
            "[tail].poll_interval must be >= 1 (got 0)".to_string(),
        ));
    }
    ensure_non_empty("[tail].sourcetype", &tail.sourcetype)?;
    ensure_extension("[tail].extension", &tail.extension)?;
    Ok(())
}

fn validate_convert(convert: &ConvertSection) -> Result<()> {
    ensure_non_empty("[convert].sourcetype", &convert.sourcetype)?;
    ensure_non_empty("[convert].index", &convert.index)?;
    ensure_extension("[convert].extension", &convert.extension)?;
    Ok(())
}

fn validate_hec(hec: &HecSection) -> Result<()> {
    ensure_non_empty("[hec].host", &hec.host)?;
    ensure_non_empty("[hec].token", &hec.token)?;
    if hec.port == 0 {
        return Err(ForwardError::ConfigError(
            "[hec].port must be between 1 and 65535 (got 0)".to_string(),
        ));
    }
    if hec.batch_size == 0 {
        return Err(ForwardError::ConfigError(
            "[hec].batch_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if hec.timeout_secs == 0 {
        return Err(ForwardError::ConfigError(
            "[hec].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn ensure_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ForwardError::ConfigError(format!("{key} must not be empty")));
    }
    Ok(())
}

fn ensure_extension(key: &str, value: &str) -> Result<()> {
    ensure_non_empty(key, value)?;
    if value.starts_with('.') {
        return Err(ForwardError::ConfigError(format!(
            "{key} must not start with a dot (got {value:?})"
        )));
    }
    Ok(())
}
