//! # Service - User Business Rules
//!
//! Wraps the user [`JsonTable`] with the rules the table itself does not
//! know about:
//!
//! - emails are unique across users (checked before create and before any
//!   update that touches `email`);
//! - ids are assigned here, from a persistent counter (see [`sequence`]).
//!
//! Inputs go through the user schema (minus `id`) before the uniqueness
//! check. The email format is checked before trimming, so `" a@b.io "` is a
//! validation error rather than a match for `"a@b.io"`.
pub mod sequence;
mod user;

pub use sequence::IdSequence;
pub use user::{NewUser, User, UserPatch};

use schema::{user_schema, Record, Schema, ValidationError, EMAIL, ID};
use serde_json::Value;
use std::path::Path;
use store::{Filter, JsonTable, StoreError};
use thiserror::Error;

/// Errors returned by [`UserService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input violated the user schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No user has the requested id.
    #[error("User not found")]
    NotFound { id: u64 },

    /// Another user already has this email.
    #[error("Duplicate email")]
    Conflict { email: String },

    /// The table file could not be written.
    #[error(transparent)]
    Store(StoreError),

    /// The id counter could not be advanced or written.
    #[error("id sequence error: {0}")]
    Sequence(#[from] std::io::Error),

    /// A stored row does not have the shape of a user.
    #[error("malformed user record: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => ServiceError::Validation(v),
            other => ServiceError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// User operations over a file-backed table.
///
/// Every method takes `&mut self`: the service is meant to have a single
/// owner (the HTTP layer keeps it behind a mutex).
#[derive(Debug)]
pub struct UserService {
    table: JsonTable,
    ids: IdSequence,
    /// The user schema without `id`, used for client input.
    input_schema: Schema,
}

impl UserService {
    /// Opens (creating if needed) the user table at `path` and its id counter.
    ///
    /// # Errors
    ///
    /// Returns an error if a fresh table file cannot be written.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut table = JsonTable::new(path.as_ref(), user_schema());
        table.init()?;
        let ids = IdSequence::load(sequence::sequence_path(table.path()));
        tracing::info!(
            path = %table.path().display(),
            users = table.len(),
            next_after = ids.last(),
            "user service ready"
        );

        Ok(Self {
            input_schema: table.schema().omit(&[ID]),
            table,
            ids,
        })
    }

    /// The schema client input is checked against (`name`, `username`, `email`).
    #[must_use]
    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    /// All users in insertion order.
    pub fn list(&mut self) -> Result<Vec<User>> {
        self.table.query(None)?.into_iter().map(decode).collect()
    }

    /// The user with `id`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no such user exists.
    pub fn get(&mut self, id: u64) -> Result<User> {
        self.table
            .query_one(&Filter::eq(ID, id))?
            .map(decode)
            .transpose()?
            .ok_or(ServiceError::NotFound { id })
    }

    /// Creates a user with a freshly assigned id.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if the email is taken,
    /// [`ServiceError::Validation`] if the input is invalid.
    pub fn create(&mut self, new: &NewUser) -> Result<User> {
        let body = self.input_schema.validate(&serde_json::to_value(new)?)?;
        self.ensure_email_free(&body, None)?;

        let floor = self.max_id()?;
        let id = self.ids.next(floor)?;

        let mut row = Record::new();
        row.insert(ID.to_string(), Value::from(id));
        row.extend(body);

        let user = decode(self.table.insert(Value::Object(row))?)?;
        tracing::info!(id = user.id, "user created");
        Ok(user)
    }

    /// Applies `patch` to the user with `id`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if the patch sets an email held by another
    /// user, [`ServiceError::NotFound`] if no user has `id`.
    pub fn update(&mut self, id: u64, patch: &UserPatch) -> Result<User> {
        let patch = self
            .input_schema
            .validate_partial(&serde_json::to_value(patch)?)?;
        self.ensure_email_free(&patch, Some(id))?;

        let updated = self.table.update(&Filter::eq(ID, id), &Value::Object(patch))?;
        let user = updated
            .into_iter()
            .next()
            .map(decode)
            .transpose()?
            .ok_or(ServiceError::NotFound { id })?;

        tracing::info!(id, "user updated");
        Ok(user)
    }

    /// Deletes the user with `id` and returns it.
    pub fn delete(&mut self, id: u64) -> Result<User> {
        let user = self
            .table
            .delete(&Filter::eq(ID, id))?
            .into_iter()
            .next()
            .map(decode)
            .transpose()?
            .ok_or(ServiceError::NotFound { id })?;

        tracing::info!(id, "user deleted");
        Ok(user)
    }

    /// Fails with `Conflict` if `fields` carries an email held by a user
    /// other than `owner`.
    fn ensure_email_free(&mut self, fields: &Record, owner: Option<u64>) -> Result<()> {
        let Some(email) = fields.get(EMAIL) else {
            return Ok(());
        };

        let existing = self.table.query_one(&Filter::eq(EMAIL, email.clone()))?;
        match existing {
            Some(row) if owner.map_or(true, |id| row.get(ID) != Some(&Value::from(id))) => {
                Err(ServiceError::Conflict {
                    email: email.as_str().unwrap_or_default().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn max_id(&mut self) -> Result<u64> {
        Ok(self
            .table
            .query(None)?
            .iter()
            .filter_map(|row| row.get(ID).and_then(Value::as_u64))
            .max()
            .unwrap_or(0))
    }
}

fn decode(row: Record) -> Result<User> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
