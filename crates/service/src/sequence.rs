//! # Sequence - Persistent User Id Counter
//!
//! Stores the last issued user id in a sidecar file next to the table
//! (`user.json` → `user.json.seq`). The file holds a single decimal number:
//!
//! ```text
//! 42
//! ```
//!
//! The next id is `max(last issued, largest id in the table) + 1`, so ids are
//! never reused after a delete and a missing or damaged counter cannot
//! collide with rows already in the table. The counter is re-read before
//! every allocation and rewritten atomically after it.
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use store::write_atomic;

/// Extension appended to the table file name.
pub const SEQUENCE_SUFFIX: &str = ".seq";

/// Returns the counter path for a table file.
pub fn sequence_path(table_path: &Path) -> PathBuf {
    let mut name: OsString = table_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(SEQUENCE_SUFFIX);
    table_path.with_file_name(name)
}

#[derive(Debug, Clone)]
pub struct IdSequence {
    path: PathBuf,
    last: u64,
}

impl IdSequence {
    /// Opens the counter at `path`. A missing file starts at zero.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let mut seq = Self {
            path: path.as_ref().to_path_buf(),
            last: 0,
        };
        seq.reload();
        seq
    }

    /// The last id handed out, as of the most recent read or allocation.
    #[must_use]
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Allocates the next id, at least `floor + 1`, and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter is exhausted or cannot be written.
    pub fn next(&mut self, floor: u64) -> io::Result<u64> {
        self.reload();

        let id = self
            .last
            .max(floor)
            .checked_add(1)
            .ok_or_else(|| io::Error::other("user id sequence exhausted (u64::MAX reached)"))?;

        write_atomic(&self.path, format!("{id}\n").as_bytes())?;
        self.last = id;
        Ok(id)
    }

    fn reload(&mut self) {
        match fs::read_to_string(&self.path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(last) => self.last = last,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "id sequence unreadable, falling back to table ids");
                    self.last = 0;
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.last = 0,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "id sequence unreadable, falling back to table ids");
                self.last = 0;
            }
        }
    }
}
