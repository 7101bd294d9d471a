//! Field rules: a kind plus an ordered list of checks.
//!
//! Checks run in declaration order. `trim` is itself a step: checks declared
//! before it see the raw string, checks after it see the trimmed one.
//!
//! Numeric checks only apply to [`FieldKind::Integer`] fields and string
//! checks only to [`FieldKind::String`] fields; a check attached to the wrong
//! kind is ignored.
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// The JSON type a field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON number without a fractional part.
    Integer,
    /// A JSON string.
    String,
}

impl FieldKind {
    fn label(self) -> &'static str {
        match self {
            FieldKind::Integer => "int",
            FieldKind::String => "string",
        }
    }
}

#[derive(Debug, Clone)]
enum Check {
    Trim,
    Positive,
    Min(i64),
    MinLen(usize),
    MaxLen(usize),
    Pattern { regex: Regex, message: String },
    Email,
}

/// Constraints for a single named field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    kind: FieldKind,
    checks: Vec<Check>,
}

impl FieldRule {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            checks: Vec::new(),
        }
    }

    /// An integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// A string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Requires the value to be strictly greater than zero.
    pub fn positive(mut self) -> Self {
        self.checks.push(Check::Positive);
        self
    }

    /// Requires the value to be at least `min`.
    pub fn min(mut self, min: i64) -> Self {
        self.checks.push(Check::Min(min));
        self
    }

    /// Strips surrounding whitespace. Only checks declared after this one
    /// see the trimmed string; it is also what ends up in the validated record.
    pub fn trim(mut self) -> Self {
        self.checks.push(Check::Trim);
        self
    }

    /// Requires at least `n` characters.
    pub fn min_len(mut self, n: usize) -> Self {
        self.checks.push(Check::MinLen(n));
        self
    }

    /// Allows at most `n` characters.
    pub fn max_len(mut self, n: usize) -> Self {
        self.checks.push(Check::MaxLen(n));
        self
    }

    /// Requires the whole string to match `regex`; `message` is reported on failure.
    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.checks.push(Check::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    /// Requires a syntactically valid email address.
    pub fn email(mut self) -> Self {
        self.checks.push(Check::Email);
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn missing_message(&self) -> String {
        format!(
            "Invalid input: expected {}, received undefined",
            self.kind.label()
        )
    }

    /// Runs every check against `value`, returning the normalized value or
    /// all violated messages.
    pub(crate) fn check(&self, value: &Value) -> Result<Value, Vec<String>> {
        match self.kind {
            FieldKind::Integer => self.check_integer(value),
            FieldKind::String => self.check_string(value),
        }
    }

    fn check_integer(&self, value: &Value) -> Result<Value, Vec<String>> {
        let n = match value {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            _ => None,
        };
        let Some(n) = n else {
            return Err(vec![type_mismatch(self.kind.label(), value)]);
        };

        let mut issues = Vec::new();
        for check in &self.checks {
            match check {
                Check::Positive if n <= 0 => {
                    issues.push("Too small: expected number to be >0".to_string())
                }
                Check::Min(min) if n < i128::from(*min) => {
                    issues.push(format!("Too small: expected number to be >={min}"))
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(value.clone())
        } else {
            Err(issues)
        }
    }

    fn check_string(&self, value: &Value) -> Result<Value, Vec<String>> {
        let Value::String(raw) = value else {
            return Err(vec![type_mismatch(self.kind.label(), value)]);
        };
        let mut s = raw.as_str();

        let mut issues = Vec::new();
        for check in &self.checks {
            let len = s.chars().count();
            match check {
                Check::Trim => s = s.trim(),
                Check::MinLen(n) if len < *n => issues.push(format!(
                    "Too small: expected string to have >={n} characters"
                )),
                Check::MaxLen(n) if len > *n => issues.push(format!(
                    "Too big: expected string to have <={n} characters"
                )),
                Check::Pattern { regex, message } if !regex.is_match(s) => {
                    issues.push(message.clone())
                }
                Check::Email if !is_email(s) => issues.push("Invalid email address".to_string()),
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(Value::String(s.to_string()))
        } else {
            Err(issues)
        }
    }
}

fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL_RE.is_match(s)
}

fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn type_mismatch(expected: &str, value: &Value) -> String {
    format!(
        "Invalid input: expected {expected}, received {}",
        received(value)
    )
}
