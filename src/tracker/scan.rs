// src/tracker/scan.rs

//! Directory scanning for candidate files.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::fs::FileSystem;

/// List the candidate files in `dir`.
///
/// Only regular files whose extension equals `extension` are yielded;
/// subdirectories and other files are skipped. The directory listing is read
/// once up front, filtering happens lazily, and the returned iterator can be
/// cloned to walk the same candidates again.
///
/// A failure to read the directory is logged and produces no candidates.
pub fn scan<'a>(
    fs: &'a dyn FileSystem,
    dir: &Path,
    extension: &'a str,
) -> impl Iterator<Item = PathBuf> + Clone + use<'a> {
    let mut entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = ?dir, "error scanning directory: {e:#}");
            Vec::new()
        }
    };
    // Stable order so passes emit files deterministically.
    entries.sort();
    debug!(dir = ?dir, entries = entries.len(), "scanned directory");

    entries
        .into_iter()
        .filter(move |path| has_extension(path, extension) && fs.is_file(path))
}

/// Whether `path` ends in `.<extension>` (case-sensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}
