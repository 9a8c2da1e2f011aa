// src/convert/mod.rs

//! One-shot conversion of a CSV directory into JSON event files.
//!
//! Unlike the tracker this keeps no state: every run converts every file in
//! full and overwrites `<output_dir>/<stem>.json`.

pub mod hec;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::ConvertSection;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::tracker::reader::source_name;
use crate::tracker::{derive_timestamp, read_all_rows, scan, Event, Fields};

pub use hec::{HecClient, SendSummary};

/// Totals for one `convert_directory` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: usize,
    pub failed: usize,
    /// Events written to JSON files.
    pub events: usize,
    /// Events accepted by HEC.
    pub sent: usize,
}

#[derive(Debug)]
pub struct Converter {
    fs: Arc<dyn FileSystem>,
    options: ConvertSection,
}

impl Converter {
    pub fn new(fs: Arc<dyn FileSystem>, options: ConvertSection) -> Self {
        Self { fs, options }
    }

    /// Read every row of a CSV file.
    pub fn read_csv_file(&self, path: &Path) -> Result<Vec<Fields>> {
        let rows = read_all_rows(self.fs.as_ref(), path)?;
        info!(file = ?path, rows = rows.len(), "read csv file");
        Ok(rows)
    }

    /// Wrap rows as events for `source`.
    pub fn to_events(&self, rows: Vec<Fields>, source: &str) -> Vec<Event> {
        rows.into_iter()
            .map(|fields| Event {
                time: derive_timestamp(&fields),
                host: Some(self.options.host.clone()),
                source: source.to_string(),
                sourcetype: self.options.sourcetype.clone(),
                index: Some(self.options.index.clone()),
                event: fields,
            })
            .collect()
    }

    /// Write events as a pretty-printed JSON array.
    pub fn save_json_file(&self, events: &[Event], path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(events)?;
        self.fs.write(path, &json)?;
        info!(file = ?path, events = events.len(), "saved json file");
        Ok(())
    }

    /// Output file for a given CSV file.
    pub fn output_path(&self, csv_path: &Path) -> PathBuf {
        let stem = csv_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_name(csv_path));
        self.options.output_dir.join(format!("{stem}.json"))
    }

    /// Convert every CSV file in the data directory, posting to `hec` when
    /// given.
    ///
    /// Only failing to create the output directory is an error; problems with
    /// individual files are logged and counted.
    pub async fn convert_directory(&self, hec: Option<&HecClient>) -> Result<ConvertSummary> {
        let mut summary = ConvertSummary::default();
        self.fs.create_dir_all(&self.options.output_dir)?;

        let data_dir = &self.options.data_dir;
        if !self.fs.is_dir(data_dir) {
            error!(dir = ?data_dir, "data directory does not exist");
            return Ok(summary);
        }

        let files: Vec<PathBuf> =
            scan(self.fs.as_ref(), data_dir, &self.options.extension).collect();
        if files.is_empty() {
            warn!(dir = ?data_dir, "no csv files found");
            return Ok(summary);
        }
        info!(files = files.len(), "found csv files to process");

        for path in files {
            let name = source_name(&path);
            info!(file = %name, "processing");

            match self.convert_file(&path, &name) {
                Ok(events) => {
                    summary.converted += 1;
                    summary.events += events.len();
                    if let Some(client) = hec {
                        summary.sent += client.send(&events).await.sent;
                    }
                    info!(file = %name, "successfully processed");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(file = %name, "error processing file: {e}");
                }
            }
        }

        Ok(summary)
    }

    fn convert_file(&self, path: &Path, source: &str) -> Result<Vec<Event>> {
        let rows = self.read_csv_file(path)?;
        let events = self.to_events(rows, source);
        self.save_json_file(&events, &self.output_path(path))?;
        Ok(events)
    }
}
