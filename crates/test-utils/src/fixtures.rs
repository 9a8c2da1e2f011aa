use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Build CSV text from a header line and data lines.
pub fn csv_text(header: &str, rows: &[&str]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// Temporary workspace with a `data/` and a `state/` directory.
pub struct CsvWorkspace {
    root: TempDir,
}

impl CsvWorkspace {
    pub fn new() -> anyhow::Result<Self> {
        let root = tempfile::tempdir()?;
        fs::create_dir_all(root.path().join("data"))?;
        fs::create_dir_all(root.path().join("state"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("json_output")
    }

    /// Write (or overwrite) `data/<name>`.
    pub fn write_csv(&self, name: &str, header: &str, rows: &[&str]) -> anyhow::Result<PathBuf> {
        let path = self.data_dir().join(name);
        fs::write(&path, csv_text(header, rows))?;
        Ok(path)
    }

    /// Append raw lines to `data/<name>`.
    pub fn append_rows(&self, name: &str, rows: &[&str]) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.data_dir().join(name))?;
        for row in rows {
            writeln!(file, "{row}")?;
        }
        Ok(())
    }
}
