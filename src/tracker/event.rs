// src/tracker/event.rs

//! Wire format of emitted events.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::tracker::reader::{Fields, Record};

/// A single event in the layout the indexer expects.
///
/// `host` and `index` are only set by the batch converter; the tail output
/// leaves them to the forwarder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub source: String,
    pub sourcetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub event: Fields,
}

impl Event {
    /// Event for the tail output stream.
    pub fn from_record(record: &Record, sourcetype: &str) -> Self {
        Self {
            time: record.time,
            host: None,
            source: record.source.clone(),
            sourcetype: sourcetype.to_string(),
            index: None,
            event: record.fields.clone(),
        }
    }
}

/// Write `record` as one JSON line and flush so the consumer sees it at once.
pub fn emit(out: &mut dyn Write, record: &Record, sourcetype: &str) -> Result<()> {
    let event = Event::from_record(record, sourcetype);
    serde_json::to_writer(&mut *out, &event)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
