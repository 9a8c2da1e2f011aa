// src/tracker/mod.rs

//! Incremental CSV file tracking.
//!
//! This module is responsible for:
//! - Finding candidate files in the data directory.
//! - Fingerprinting files (mtime, size, content hash) to spot changes.
//! - Reading only the rows that were not emitted before.
//! - Deriving event times and writing events as JSON lines.
//! - Loading and persisting the tracker snapshot.
//!
//! It does **not** loop or sleep; passes are driven by [`crate::engine`].

pub mod detect;
pub mod event;
pub mod hash;
pub mod reader;
pub mod scan;
pub mod state;
pub mod timestamp;

pub use detect::{check_file, fingerprint, needs_processing, FileCheck};
pub use event::{emit, Event};
pub use hash::compute_file_hash;
pub use reader::{process_file, read_all_rows, Fields, FileBatch, Record};
pub use scan::scan;
pub use state::{
    FileStateStore, Fingerprint, MemoryStateStore, StateStore, TrackerState, WatchedFile,
    STATE_FILE_NAME,
};
pub use timestamp::{derive_timestamp, derive_timestamp_or, parse_timestamp};
