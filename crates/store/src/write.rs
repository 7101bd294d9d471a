/// Write path: `insert()`, `insert_many()`, `update()`, `delete()`.
///
/// Every mutation reloads the file, validates its input before touching the
/// row sequence, builds the new sequence, and rewrites the whole file. A
/// validation failure leaves both memory and disk unchanged.
use schema::Record;
use serde_json::Value;

use crate::{Filter, JsonTable, Result};

impl JsonTable {
    /// Validates `row` and appends it. Returns the stored (normalized) row.
    ///
    /// # Errors
    ///
    /// [`crate::StoreError::Validation`] if the row violates the schema, or an
    /// I/O error if the file cannot be written.
    pub fn insert(&mut self, row: Value) -> Result<Record> {
        let mut inserted = self.insert_many([row])?;
        Ok(inserted.remove(0))
    }

    /// Validates every row and appends them in order.
    ///
    /// All-or-nothing: if any row is invalid, none are written and the first
    /// validation error is returned.
    pub fn insert_many<I>(&mut self, rows: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = Value>,
    {
        self.load()?;

        let validated = rows
            .into_iter()
            .map(|row| self.schema.validate(&row))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.rows.extend(validated.iter().cloned());
        self.save()?;

        tracing::info!(path = %self.path.display(), inserted = validated.len(), "rows inserted");
        Ok(validated)
    }

    /// Overwrites the fields present in `patch` on every row matching
    /// `filter`. Other fields, other rows, and row positions are untouched.
    ///
    /// The patch is validated against the schema restricted to the fields it
    /// contains. Returns the updated rows as stored.
    pub fn update(&mut self, filter: &Filter, patch: &Value) -> Result<Vec<Record>> {
        self.load()?;

        let patch = self.schema.validate_partial(patch)?;

        let mut updated = Vec::new();
        let next: Vec<Record> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| {
                if !filter.matches(&row) {
                    return row;
                }
                let mut row = row;
                for (field, value) in &patch {
                    row.insert(field.clone(), value.clone());
                }
                updated.push(row.clone());
                row
            })
            .collect();

        self.rows = next;
        self.save()?;

        tracing::info!(path = %self.path.display(), updated = updated.len(), "rows updated");
        Ok(updated)
    }

    /// Removes every row matching `filter` and returns the removed rows.
    pub fn delete(&mut self, filter: &Filter) -> Result<Vec<Record>> {
        self.load()?;

        let (removed, kept): (Vec<Record>, Vec<Record>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| filter.matches(row));

        self.rows = kept;
        self.save()?;

        tracing::info!(path = %self.path.display(), deleted = removed.len(), "rows deleted");
        Ok(removed)
    }
}
