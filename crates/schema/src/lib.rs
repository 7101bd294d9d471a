//! # Schema - Record Validation
//!
//! Describes the shape of a record as an ordered list of [`FieldRule`]s and
//! validates untyped JSON input against it. Validation either produces a
//! normalized [`Record`] (unknown keys stripped, strings trimmed where the rule
//! asks for it, keys in schema order) or a [`ValidationError`] that lists every
//! violation per field.
//!
//! ## Example
//!
//! ```rust
//! use schema::{FieldRule, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field(FieldRule::integer("id").positive())
//!     .field(FieldRule::string("name").trim().max_len(8));
//!
//! let row = schema.validate(&json!({ "id": 1, "name": "  Ada " })).unwrap();
//! assert_eq!(row["name"], "Ada");
//!
//! let err = schema.validate(&json!({ "id": 0, "name": "Ada" })).unwrap_err();
//! assert!(err.field("id").is_some());
//! ```

mod error;
mod rules;
mod user;

pub use error::{FieldError, ValidationError};
pub use rules::{FieldKind, FieldRule};
pub use user::{user_schema, EMAIL, ID, NAME, USERNAME};

use error::Issue;
use serde_json::{Map, Value};

/// A validated row: field names mapped to scalar JSON values, in schema order.
pub type Record = Map<String, Value>;

/// An ordered set of field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    /// Creates an empty schema. Add fields with [`Schema::field`].
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field rule, replacing any earlier rule with the same name.
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.retain(|f| f.name() != rule.name());
        self.fields.push(rule);
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Returns a copy of this schema without the named fields.
    pub fn omit(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|f| !names.contains(&f.name()))
                .cloned()
                .collect(),
        }
    }

    /// Validates a full record. Every field is required.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the input is not an object or any
    /// field is missing or violates its rule.
    pub fn validate(&self, input: &Value) -> Result<Record, ValidationError> {
        self.run(input, true)
    }

    /// Validates only the fields present in `input`. Used for patches.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::validate`], except that missing fields are allowed.
    pub fn validate_partial(&self, input: &Value) -> Result<Record, ValidationError> {
        self.run(input, false)
    }

    fn run(&self, input: &Value, require_all: bool) -> Result<Record, ValidationError> {
        let Value::Object(obj) = input else {
            return Err(ValidationError::from_issues(vec![Issue {
                path: String::new(),
                message: rules::type_mismatch("object", input),
                value: Some(input.clone()),
            }]));
        };

        let mut out = Record::new();
        let mut issues = Vec::new();

        for rule in &self.fields {
            match obj.get(rule.name()) {
                Some(value) => match rule.check(value) {
                    Ok(normalized) => {
                        out.insert(rule.name().to_string(), normalized);
                    }
                    Err(messages) => {
                        for message in messages {
                            issues.push(Issue {
                                path: rule.name().to_string(),
                                message,
                                value: Some(value.clone()),
                            });
                        }
                    }
                },
                None if require_all => issues.push(Issue {
                    path: rule.name().to_string(),
                    message: rule.missing_message(),
                    value: None,
                }),
                None => {}
            }
        }

        if issues.is_empty() {
            Ok(out)
        } else {
            Err(ValidationError::from_issues(issues))
        }
    }
}
