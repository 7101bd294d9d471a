/// Reload logic.
///
/// Every operation starts here so that it observes the latest file contents.
/// A file that is missing, unreadable, or not a JSON array of objects is
/// treated as an empty table and immediately rewritten, which also creates
/// the file on first use.
use schema::Record;
use std::fs;

use crate::{JsonTable, Result};

impl JsonTable {
    pub(crate) fn load(&mut self) -> Result<()> {
        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Vec<Record>>(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(rows) => {
                self.rows = rows;
                tracing::debug!(path = %self.path.display(), rows = self.rows.len(), "table loaded");
                Ok(())
            }
            Err(reason) => {
                if self.path.exists() {
                    tracing::warn!(
                        path = %self.path.display(),
                        %reason,
                        "table file unreadable, resetting to empty"
                    );
                } else {
                    tracing::info!(path = %self.path.display(), "creating table file");
                }
                self.rows.clear();
                self.save()
            }
        }
    }
}
