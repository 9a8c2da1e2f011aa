// src/fs/mock.rs

//! In-memory filesystem for tests.
//!
//! Every write bumps a logical clock which becomes the file's mtime, so two
//! writes are always distinguishable unless a test pins the mtime with
//! [`MockFileSystem::set_modified`]. Directories exist implicitly as soon as a
//! file below them is written.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, bail, Result};

use super::{FileMeta, FileSystem};

/// First mtime handed out; roughly late 2023.
const CLOCK_START: f64 = 1_700_000_000.0;
/// Advance per write. Fractional so mtimes look like real sub-second stamps.
const CLOCK_STEP: f64 = 1.047_515_9;

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: f64,
}

#[derive(Debug)]
struct Tree {
    files: BTreeMap<PathBuf, MockFile>,
    dirs: BTreeSet<PathBuf>,
    clock: f64,
}

impl Tree {
    fn tick(&mut self) -> f64 {
        self.clock += CLOCK_STEP;
        self.clock
    }

    fn add_dirs(&mut self, path: &Path) {
        for dir in path.ancestors() {
            if dir.as_os_str().is_empty() || !self.dirs.insert(dir.to_path_buf()) {
                break;
            }
        }
    }

    fn put(&mut self, path: &Path, content: Vec<u8>, modified: f64) {
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files
            .insert(path.to_path_buf(), MockFile { content, modified });
    }

    fn file(&self, path: &Path) -> Result<&MockFile> {
        match self.files.get(path) {
            Some(file) => Ok(file),
            None if self.dirs.contains(path) => bail!("is a directory: {path:?}"),
            None => bail!("no such file: {path:?}"),
        }
    }
}

/// Cloning shares the underlying tree, so a test can keep a handle while the
/// tracker owns another.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    tree: Arc<Mutex<Tree>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Tree {
                files: BTreeMap::new(),
                dirs: BTreeSet::new(),
                clock: CLOCK_START,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or overwrite a file with a fresh mtime.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut tree = self.lock();
        let modified = tree.tick();
        tree.put(path.as_ref(), content.into(), modified);
    }

    /// Append bytes to a file (creating it if needed) with a fresh mtime.
    pub fn append(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        let mut bytes = tree
            .files
            .get(path)
            .map(|f| f.content.clone())
            .unwrap_or_default();
        bytes.extend_from_slice(content.as_ref());
        let modified = tree.tick();
        tree.put(path, bytes, modified);
    }

    /// Replace a file's content without touching its mtime.
    pub fn replace_keep_mtime(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        let modified = tree.files.get(path).map(|f| f.modified).unwrap_or(0.0);
        tree.put(path, content.into(), modified);
    }

    pub fn set_modified(&self, path: impl AsRef<Path>, at: f64) {
        if let Some(file) = self.lock().files.get_mut(path.as_ref()) {
            file.modified = at;
        }
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.lock().add_dirs(path.as_ref());
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let content = self.lock().file(path)?.content.clone();
        String::from_utf8(content).map_err(|e| anyhow!("invalid UTF-8 in {path:?}: {e}"))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let content = self.lock().file(path)?.content.clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.lock();
        tree.files.contains_key(path) || tree.dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    // Tests use absolute paths throughout.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    fn metadata(&self, path: &Path) -> Result<FileMeta> {
        let tree = self.lock();
        if tree.dirs.contains(path) {
            return Ok(FileMeta {
                modified: 0.0,
                len: 0,
            });
        }
        let file = tree.file(path)?;
        Ok(FileMeta {
            modified: file.modified,
            len: file.content.len() as u64,
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let tree = self.lock();
        if !tree.dirs.contains(path) {
            bail!("not a directory: {path:?}");
        }
        let is_child = |p: &&PathBuf| p.parent() == Some(path);
        let files = tree.files.keys().filter(is_child);
        let dirs = tree.dirs.iter().filter(is_child);
        Ok(files.chain(dirs).cloned().collect())
    }
}
