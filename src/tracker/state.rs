// src/tracker/state.rs

//! Persistent tracker state.
//!
//! The state is a plain value: it is loaded once, handed to each pass, and
//! handed back with whatever the pass learned. Stores only know how to load
//! and persist a whole snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fs::FileSystem;

/// File name of the snapshot inside the state directory.
pub const STATE_FILE_NAME: &str = "csv_state.json";

/// What the tracker observed about a file the last time it processed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedFile {
    pub last_mtime: f64,
    pub last_size: u64,
    pub last_hash: String,
    /// Highest 1-based data row already emitted. Never decreases.
    pub last_row: u64,
}

/// Current mtime/size/hash of a file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub mtime: f64,
    pub size: u64,
    pub hash: String,
}

impl WatchedFile {
    /// Whether this snapshot still describes a file with `fingerprint`.
    pub fn matches(&self, fingerprint: &Fingerprint) -> bool {
        self.last_mtime == fingerprint.mtime
            && self.last_size == fingerprint.size
            && self.last_hash == fingerprint.hash
    }
}

/// Mapping from tracked path to its last snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerState {
    files: BTreeMap<String, WatchedFile>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&WatchedFile> {
        self.files.get(&state_key(path))
    }

    /// Stored row index for `path`, `0` when the path is unseen.
    pub fn last_row(&self, path: &Path) -> u64 {
        self.get(path).map(|f| f.last_row).unwrap_or(0)
    }

    /// Record a successful processing of `path`.
    ///
    /// The stored row index only ever moves forward.
    pub fn commit(&mut self, path: &Path, fingerprint: Fingerprint, row: u64) {
        let key = state_key(path);
        let last_row = self
            .files
            .get(&key)
            .map(|f| f.last_row.max(row))
            .unwrap_or(row);
        self.files.insert(
            key,
            WatchedFile {
                last_mtime: fingerprint.mtime,
                last_size: fingerprint.size,
                last_hash: fingerprint.hash,
                last_row,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn state_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Abstract storage for tracker snapshots.
pub trait StateStore: Send + Sync {
    /// Load the last persisted snapshot.
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot yields an empty
    /// state so the tracker can keep going.
    fn load(&self) -> TrackerState;

    fn persist(&mut self, state: &TrackerState) -> Result<()>;
}

/// Stores the snapshot as JSON in `<state_dir>/csv_state.json`.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileStateStore {
    pub fn new(state_dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: state_dir.into().join(STATE_FILE_NAME),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<TrackerState> {
        let contents = self.fs.read_to_string(&self.path)?;
        let state = serde_json::from_str(&contents)
            .with_context(|| format!("parsing state file {:?}", self.path))?;
        Ok(state)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> TrackerState {
        if !self.fs.exists(&self.path) {
            debug!(path = ?self.path, "no state file yet; starting empty");
            return TrackerState::new();
        }

        match self.try_load() {
            Ok(state) => {
                info!(files = state.len(), "loaded tracker state");
                state
            }
            Err(e) => {
                warn!(path = ?self.path, "ignoring unusable state file: {e:#}");
                TrackerState::new()
            }
        }
    }

    fn persist(&mut self, state: &TrackerState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state).context("serializing tracker state")?;
        self.fs.write(&self.path, &json)?;
        debug!(path = ?self.path, files = state.len(), "persisted tracker state");
        Ok(())
    }
}

/// Keeps the snapshot in memory only (lost on restart).
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: TrackerState,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> TrackerState {
        self.state.clone()
    }

    fn persist(&mut self, state: &TrackerState) -> Result<()> {
        self.state = state.clone();
        Ok(())
    }
}
