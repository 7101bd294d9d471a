use crate::{FieldRule, Schema};
use regex::Regex;
use std::sync::LazyLock;

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern compiles"));

/// The user record: `id`, `name`, `username`, `email`.
pub fn user_schema() -> Schema {
    Schema::new()
        .field(FieldRule::integer(ID).positive().min(1))
        .field(FieldRule::string(NAME).trim().max_len(52))
        .field(
            FieldRule::string(USERNAME)
                .pattern(USERNAME_RE.clone(), "Must be a valid username")
                .min_len(3)
                .max_len(24),
        )
        .field(FieldRule::string(EMAIL).email().trim())
}
