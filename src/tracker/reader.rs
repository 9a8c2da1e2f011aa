// src/tracker/reader.rs

//! CSV parsing into records.
//!
//! The first line of a file is its header. Data rows are numbered from 1.
//! Rows whose length differs from the header are kept: values are matched to
//! header names by position, missing trailing values become `""`, and values
//! past the last header are dropped.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::tracker::state::TrackerState;
use crate::tracker::timestamp::derive_timestamp;

/// Column name to value, in header order.
pub type Fields = IndexMap<String, String>;

/// One data row of a CSV file, ready to be emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based data row index within the file.
    pub row: u64,
    /// File name (no directory) the row came from.
    pub source: String,
    /// Event time in fractional Unix seconds.
    pub time: f64,
    pub fields: Fields,
}

/// Result of reading one file from its stored row index onwards.
#[derive(Debug, Clone, Default)]
pub struct FileBatch {
    /// Rows after the stored index, in file order.
    pub records: Vec<Record>,
    /// Row index to store for the file once the records are emitted.
    pub last_row: u64,
    /// Number of data rows currently in the file.
    pub rows_seen: u64,
}

/// Read `path` and build records for every row not emitted yet.
pub fn process_file(fs: &dyn FileSystem, path: &Path, state: &TrackerState) -> Result<FileBatch> {
    let stored = state.last_row(path);
    let source = source_name(path);
    let mut reader = csv_reader(fs.open_read(path)?);
    let headers = reader.headers()?.clone();

    let mut batch = FileBatch::default();
    for result in reader.records() {
        let record = result?;
        batch.rows_seen += 1;
        let row = batch.rows_seen;
        if row <= stored {
            continue;
        }

        let fields = map_row(&headers, &record, row);
        let time = derive_timestamp(&fields);
        batch.records.push(Record {
            row,
            source: source.clone(),
            time,
            fields,
        });
    }

    if batch.rows_seen < stored {
        warn!(
            file = %source,
            stored,
            rows = batch.rows_seen,
            "file has fewer rows than already emitted; keeping stored row index"
        );
    }
    batch.last_row = stored.max(batch.rows_seen);

    debug!(
        file = %source,
        rows = batch.rows_seen,
        new = batch.records.len(),
        "read csv file"
    );
    Ok(batch)
}

/// Read every data row of `path`, ignoring any tracker state.
pub fn read_all_rows(fs: &dyn FileSystem, path: &Path) -> Result<Vec<Fields>> {
    let mut reader = csv_reader(fs.open_read(path)?);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(map_row(&headers, &record, idx as u64 + 1));
    }
    Ok(rows)
}

/// File name used as the `source` of emitted events.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

fn map_row(headers: &StringRecord, record: &StringRecord, row: u64) -> Fields {
    if record.len() != headers.len() {
        debug!(
            row,
            expected = headers.len(),
            got = record.len(),
            "column count mismatch; mapping values by position"
        );
    }

    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), record.get(i).unwrap_or("").to_string()))
        .collect()
}
