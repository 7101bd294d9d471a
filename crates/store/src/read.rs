/// Read path: `query()` and `query_one()`.
///
/// Both reload the file first. Results keep the stored row order.
use schema::Record;

use crate::{Filter, JsonTable, Result};

impl JsonTable {
    /// Returns every row when `filter` is `None`, otherwise the rows it
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns an error only if reloading has to rewrite the file and fails.
    pub fn query(&mut self, filter: Option<&Filter>) -> Result<Vec<Record>> {
        self.load()?;
        Ok(match filter {
            None => self.rows.clone(),
            Some(filter) => self
                .rows
                .iter()
                .filter(|row| filter.matches(row))
                .cloned()
                .collect(),
        })
    }

    /// Returns the first matching row, or `None`.
    pub fn query_one(&mut self, filter: &Filter) -> Result<Option<Record>> {
        self.load()?;
        Ok(self.rows.iter().find(|row| filter.matches(row)).cloned())
    }
}
