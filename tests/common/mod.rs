#![allow(dead_code, unused_imports)]

pub use csvforward_test_utils::fixtures::{csv_text, CsvWorkspace};
pub use csvforward_test_utils::output::{parse_events, BrokenPipe, SharedBuffer};
pub use csvforward_test_utils::stub_hec::{CapturedRequest, StubHecServer};
pub use csvforward_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;

use csvforward::engine::{Tracker, TrackerOptions};
use csvforward::fs::mock::MockFileSystem;
use csvforward::fs::{FileSystem, RealFileSystem};
use csvforward::tracker::{FileStateStore, MemoryStateStore};

/// Directory used for data files on the mock filesystem.
pub const MOCK_DATA_DIR: &str = "/data";
pub const MOCK_STATE_DIR: &str = "/state";

/// Tracker over a mock filesystem with an in-memory state store.
pub fn mock_tracker(fs: &MockFileSystem) -> Tracker {
    let fs: Arc<dyn FileSystem> = Arc::new(fs.clone());
    Tracker::new(
        fs,
        Box::new(MemoryStateStore::new()),
        TrackerOptions::new(MOCK_DATA_DIR),
    )
}

/// Tracker over a mock filesystem persisting to `/state/csv_state.json`.
pub fn mock_tracker_with_file_store(fs: &MockFileSystem) -> Tracker {
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let store = FileStateStore::new(MOCK_STATE_DIR, Arc::clone(&shared));
    Tracker::new(shared, Box::new(store), TrackerOptions::new(MOCK_DATA_DIR))
}

/// Tracker over the real directories of a [`CsvWorkspace`].
pub fn workspace_tracker(ws: &CsvWorkspace) -> Tracker {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let store = FileStateStore::new(ws.state_dir(), Arc::clone(&fs));
    Tracker::new(fs, Box::new(store), TrackerOptions::new(ws.data_dir()))
}
