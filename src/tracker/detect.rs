// src/tracker/detect.rs

//! Change detection against the stored snapshot.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, error};

use crate::fs::FileSystem;
use crate::tracker::hash::compute_file_hash;
use crate::tracker::state::{Fingerprint, TrackerState};

/// Outcome of comparing a file on disk with its stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FileCheck {
    /// Never processed before.
    New(Fingerprint),
    /// mtime, size or content differ from the snapshot.
    Changed(Fingerprint),
    Unchanged,
    /// Could not stat or hash the file; retry on the next pass.
    Failed,
}

impl FileCheck {
    /// The fresh fingerprint, if the file needs processing.
    pub fn into_fingerprint(self) -> Option<Fingerprint> {
        match self {
            FileCheck::New(fp) | FileCheck::Changed(fp) => Some(fp),
            FileCheck::Unchanged | FileCheck::Failed => None,
        }
    }
}

/// Read the current mtime, size and content hash of `path`.
pub fn fingerprint(fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint> {
    let meta = fs.metadata(path)?;
    let hash = compute_file_hash(fs, path)?;
    Ok(Fingerprint {
        mtime: meta.modified,
        size: meta.len,
        hash,
    })
}

/// Compare `path` with its snapshot in `state`.
///
/// The state is not modified; the caller commits the fingerprint once the
/// file has been processed successfully.
pub fn check_file(fs: &dyn FileSystem, path: &Path, state: &TrackerState) -> FileCheck {
    let current = match fingerprint(fs, path) {
        Ok(fp) => fp,
        Err(e) => {
            error!(file = ?path, "error checking file: {e:#}");
            return FileCheck::Failed;
        }
    };

    match state.get(path) {
        None => FileCheck::New(current),
        Some(stored) if stored.matches(&current) => {
            debug!(file = ?path, "unchanged since last pass");
            FileCheck::Unchanged
        }
        Some(_) => FileCheck::Changed(current),
    }
}

/// Whether `path` is unseen or differs from its snapshot.
pub fn needs_processing(fs: &dyn FileSystem, path: &Path, state: &TrackerState) -> bool {
    matches!(
        check_file(fs, path, state),
        FileCheck::New(_) | FileCheck::Changed(_)
    )
}
