use schema::Record;
use serde_json::Value;

/// Selects a subset of rows.
///
/// `Equals` holds when every listed field is present on the row with an equal
/// JSON value; an empty `Equals` matches every row. `Predicate` runs arbitrary
/// code against the row.
pub enum Filter {
    Equals(Record),
    Predicate(Box<dyn Fn(&Record) -> bool + Send + Sync>),
}

impl Filter {
    /// A single-field equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Record::new();
        fields.insert(field.into(), value.into());
        Filter::Equals(fields)
    }

    /// Adds another equality condition. Has no effect on a predicate filter.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Filter::Equals(fields) = &mut self {
            fields.insert(field.into(), value.into());
        }
        self
    }

    /// A filter backed by an arbitrary predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    #[must_use]
    pub fn matches(&self, row: &Record) -> bool {
        match self {
            Filter::Equals(fields) => fields
                .iter()
                .all(|(field, expected)| row.get(field) == Some(expected)),
            Filter::Predicate(f) => f(row),
        }
    }
}

impl From<Record> for Filter {
    fn from(fields: Record) -> Self {
        Filter::Equals(fields)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Equals(fields) => f.debug_tuple("Equals").field(fields).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
