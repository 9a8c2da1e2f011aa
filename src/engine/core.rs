// src/engine/core.rs

//! Synchronous pass logic.
//!
//! [`Tracker`] performs exactly one scan-and-process cycle per call to
//! [`Tracker::run_pass`]. It owns no clock and never sleeps; the tracker
//! state goes in by value and comes back out, so a pass can be exercised
//! against an in-memory filesystem and a `Vec<u8>` output.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::tracker::reader::{source_name, FileBatch};
use crate::tracker::{
    check_file, emit, process_file, scan, StateStore, TrackerState,
};

/// Static inputs of a pass.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub data_dir: PathBuf,
    /// Extension of candidate files, without the dot.
    pub extension: String,
    /// Event-category label put on every event.
    pub sourcetype: String,
}

impl TrackerOptions {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: "csv".to_string(),
            sourcetype: "csv_data".to_string(),
        }
    }

    pub fn with_sourcetype(mut self, sourcetype: impl Into<String>) -> Self {
        self.sourcetype = sourcetype.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// What happened during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Files matching the extension.
    pub candidates: usize,
    /// Files that needed processing and were processed successfully.
    pub processed: usize,
    /// Files that needed processing but failed; retried next pass.
    pub failed: usize,
    /// Events written to the output.
    pub emitted: usize,
    /// Whether the state was written to the store after the pass.
    pub persisted: bool,
}

pub struct Tracker {
    fs: Arc<dyn FileSystem>,
    store: Box<dyn StateStore>,
    options: TrackerOptions,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("fs", &self.fs)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: Box<dyn StateStore>,
        options: TrackerOptions,
    ) -> Self {
        Self { fs, store, options }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Load the persisted snapshot (empty if missing or unusable).
    pub fn load_state(&self) -> TrackerState {
        self.store.load()
    }

    /// Persist `state`, logging instead of failing.
    pub fn persist_state(&mut self, state: &TrackerState) -> bool {
        match self.store.persist(state) {
            Ok(()) => true,
            Err(e) => {
                error!("error saving tracker state: {e:#}");
                false
            }
        }
    }

    /// Run one pass: every changed candidate is read from its stored row
    /// index onwards, its new rows are emitted to `out`, and its snapshot is
    /// updated.
    ///
    /// A file that fails at any step keeps its old snapshot and is retried on
    /// the next pass. The state is persisted if at least one event was
    /// emitted.
    pub fn run_pass(
        &mut self,
        mut state: TrackerState,
        out: &mut dyn Write,
    ) -> (TrackerState, PassSummary) {
        let fs = Arc::clone(&self.fs);
        let dir = self.resolved_data_dir();
        let mut summary = PassSummary::default();

        for path in scan(fs.as_ref(), &dir, &self.options.extension) {
            summary.candidates += 1;

            let Some(fingerprint) = check_file(fs.as_ref(), &path, &state).into_fingerprint()
            else {
                continue;
            };

            let name = source_name(&path);
            info!(file = %name, "processing");

            match self.process_and_emit(fs.as_ref(), &path, &state, out) {
                Ok(batch) => {
                    let count = batch.records.len();
                    state.commit(&path, fingerprint, batch.last_row);
                    summary.processed += 1;
                    summary.emitted += count;
                    info!(file = %name, records = count, "processed new records");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(file = %name, "error processing csv file: {e}");
                }
            }
        }

        if summary.emitted > 0 {
            summary.persisted = self.persist_state(&state);
            info!(records = summary.emitted, "total records processed");
        } else {
            debug!(candidates = summary.candidates, "pass emitted nothing");
        }

        (state, summary)
    }

    fn process_and_emit(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
        state: &TrackerState,
        out: &mut dyn Write,
    ) -> Result<FileBatch> {
        let batch = process_file(fs, path, state)?;
        for record in &batch.records {
            emit(out, record, &self.options.sourcetype)?;
        }
        Ok(batch)
    }

    /// Absolute form of the data directory when it can be resolved, so state
    /// keys do not depend on the working directory.
    fn resolved_data_dir(&self) -> PathBuf {
        self.fs
            .canonicalize(&self.options.data_dir)
            .unwrap_or_else(|_| self.options.data_dir.clone())
    }
}
