//! # Store - JSON File Table
//!
//! A single-table record store backed by one pretty-printed JSON file. Every
//! row is validated against a [`Schema`] before it is written, rows keep their
//! insertion order, and the whole file is the unit of persistence.
//!
//! ## Operation Cycle
//!
//! ```text
//! caller
//!   |
//!   v
//! ┌─────────────────────────────────────────────┐
//! │                 JSON TABLE                  │
//! │                                             │
//! │ recovery.rs → read file → rows in memory    │
//! │                  |  (missing / corrupt?)    │
//! │                  |           yes            │
//! │                  v                          │
//! │               empty table, saved at once    │
//! │                                             │
//! │ read.rs  → filter rows (insertion order)    │
//! │ write.rs → validate → new row sequence      │
//! │                  |                          │
//! │                  v                          │
//! │ persist.rs → tmp file → fsync → rename      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module         | Purpose                                               |
//! |----------------|-------------------------------------------------------|
//! | [`lib.rs`]     | `JsonTable` struct, constructor, accessors, `Debug`   |
//! | [`filter`]     | `Filter`: field equality or arbitrary predicate       |
//! | [`recovery`]   | Reload from disk, self-heal on missing/corrupt files  |
//! | [`read`]       | `query()`, `query_one()`                              |
//! | [`write`]      | `insert()`, `insert_many()`, `update()`, `delete()`   |
//! | [`persist`]    | Atomic whole-file writes                              |
//!
//! ## Concurrency
//!
//! Each operation reloads the file first and mutating operations rewrite it
//! wholesale. There is no file lock: two processes writing the same file race
//! and the last writer wins. Within a process, every operation takes
//! `&mut self`, so a single owner serializes access.
mod filter;
mod persist;
mod read;
mod recovery;
mod write;

pub use filter::Filter;
pub use persist::write_atomic;
pub use schema::{Record, Schema, ValidationError};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by table operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input did not satisfy the table schema. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An underlying I/O error while writing the table file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory rows could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A file-backed, schema-validated table of records.
///
/// # Write Path
///
/// 1. Reload the current rows from the file.
/// 2. Validate the input against the schema (fail before touching disk).
/// 3. Build the new row sequence in memory.
/// 4. Rewrite the whole file atomically.
///
/// # Read Path
///
/// 1. Reload the current rows from the file.
/// 2. Return the rows matching the filter, in stored order.
pub struct JsonTable {
    pub(crate) path: PathBuf,
    pub(crate) schema: Schema,
    /// Rows as of the last reload or write, in insertion order.
    pub(crate) rows: Vec<Record>,
}

impl std::fmt::Debug for JsonTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonTable")
            .field("path", &self.path)
            .field("fields", &self.schema.field_names().collect::<Vec<_>>())
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl JsonTable {
    /// Associates a table with a file and a schema. Nothing is read until the
    /// first operation (or [`JsonTable::init`]).
    pub fn new<P: AsRef<Path>>(path: P, schema: Schema) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Loads the table once up front, creating the file if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if a fresh file cannot be written.
    pub fn init(&mut self) -> Result<()> {
        self.load()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The schema every row is validated against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows as of the last operation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table held no rows after the last operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests;
