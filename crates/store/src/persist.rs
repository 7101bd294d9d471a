//! # Persist - Whole-File Writes
//!
//! The table file is rewritten in full on every mutation: serialize, write to
//! a `.tmp` sibling, fsync, then rename over the target so readers never see
//! a half-written file.
//!
//! On Windows, `rename` over an existing file can fail with "Access is
//! denied" while the target is still cached by the OS or antivirus, so a
//! failed rename falls back to a direct truncate-and-write.
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{JsonTable, Result};

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f: File = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(bytes)?;
    f.flush()?;
    f.sync_all()
}

/// Replaces the contents of `path` with `bytes` via temp file + rename.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns any I/O error from directory creation, writing, or syncing.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    write_synced(&tmp, bytes)?;

    if fs::rename(&tmp, path).is_err() {
        write_synced(path, bytes)?;
        let _ = fs::remove_file(&tmp);
    }

    Ok(())
}

impl JsonTable {
    /// Writes every row to disk as a pretty-printed JSON array.
    pub(crate) fn save(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.rows)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), rows = self.rows.len(), "table saved");
        Ok(())
    }
}
