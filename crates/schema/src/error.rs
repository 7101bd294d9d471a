use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Violations reported for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// All messages for the field, joined with `"; "`.
    pub message: String,
    /// The offending input, absent when the field was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A record failed schema validation.
///
/// `Display` yields the human-readable summary, e.g.
/// `Validation failed: Invalid email address at "email"`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{summary}")]
pub struct ValidationError {
    summary: String,
    fields: BTreeMap<String, FieldError>,
}

/// A single violation before grouping by field.
pub(crate) struct Issue {
    pub(crate) path: String,
    pub(crate) message: String,
    pub(crate) value: Option<Value>,
}

impl ValidationError {
    pub(crate) fn from_issues(issues: Vec<Issue>) -> Self {
        let summary = issues
            .iter()
            .map(|issue| {
                if issue.path.is_empty() {
                    issue.message.clone()
                } else {
                    format!("{} at \"{}\"", issue.message, issue.path)
                }
            })
            .collect::<Vec<_>>()
            .join("; ");

        let mut fields: BTreeMap<String, FieldError> = BTreeMap::new();
        for issue in issues {
            match fields.get_mut(&issue.path) {
                Some(existing) => {
                    existing.message.push_str("; ");
                    existing.message.push_str(&issue.message);
                }
                None => {
                    fields.insert(
                        issue.path,
                        FieldError {
                            message: issue.message,
                            value: issue.value,
                        },
                    );
                }
            }
        }

        Self {
            summary: format!("Validation failed: {summary}"),
            fields,
        }
    }

    /// The human-readable summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Violations keyed by field path. The empty path refers to the input as a whole.
    pub fn fields(&self) -> &BTreeMap<String, FieldError> {
        &self.fields
    }

    /// Violations for one field, if any.
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.fields.get(name)
    }
}
