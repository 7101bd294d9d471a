use crate::JsonTable;
use schema::{FieldRule, Record, Schema};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// `{ id: positive int, name: non-empty trimmed string }`
pub fn people_schema() -> Schema {
    Schema::new()
        .field(FieldRule::integer("id").positive().min(1))
        .field(FieldRule::string("name").trim().min_len(1))
}

pub fn open(path: &Path) -> JsonTable {
    JsonTable::new(path, people_schema())
}

pub fn read_file(path: &Path) -> Vec<Record> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

pub fn ids(rows: &[Record]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

pub fn record(value: Value) -> Record {
    value.as_object().unwrap().clone()
}
