use super::helpers::{ids, open, read_file, record};
use crate::*;
use anyhow::Result;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

// --------------------- insert ---------------------

#[test]
fn insert_writes_row_to_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);
    table.init()?;

    let row = table.insert(json!({ "id": 1, "name": "TEST" }))?;

    assert_eq!(row, record(json!({ "id": 1, "name": "TEST" })));
    assert_eq!(read_file(&path), vec![row]);
    Ok(())
}

#[test]
fn insert_returns_normalized_row() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));

    let row = table.insert(json!({ "name": "  Ada  ", "id": 4, "ignored": true }))?;

    assert_eq!(row, record(json!({ "id": 4, "name": "Ada" })));
    Ok(())
}

#[test]
fn insert_many_preserves_order() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);

    table.insert_many([
        json!({ "id": 1, "name": "First" }),
        json!({ "id": 2, "name": "Second" }),
    ])?;
    table.insert(json!({ "id": 3, "name": "Third" }))?;

    assert_eq!(ids(&table.query(None)?), vec![1, 2, 3]);
    assert_eq!(read_file(&path).len(), 3);
    Ok(())
}

#[test]
fn invalid_insert_leaves_file_unchanged() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);
    table.insert(json!({ "id": 1, "name": "First" }))?;
    let before = fs::read_to_string(&path)?;

    let err = table.insert(json!({ "id": 0, "name": "Zero" })).unwrap_err();

    match err {
        StoreError::Validation(v) => assert!(v.field("id").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&path)?, before);
    assert_eq!(table.len(), 1);
    Ok(())
}

#[test]
fn wrong_type_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));

    assert!(matches!(
        table.insert(json!({ "id": "test", "name": "TEST" })),
        Err(StoreError::Validation(_))
    ));
    Ok(())
}

#[test]
fn batch_insert_is_all_or_nothing() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);
    table.init()?;

    let res = table.insert_many([
        json!({ "id": 1, "name": "First" }),
        json!({ "id": -5, "name": "Bad" }),
        json!({ "id": 3, "name": "Third" }),
    ]);

    assert!(res.is_err());
    assert!(read_file(&path).is_empty());
    assert!(table.query(None)?.is_empty());
    Ok(())
}

// --------------------- update ---------------------

#[test]
fn update_by_equality_rewrites_in_place() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));
    table.insert_many([
        json!({ "id": 1, "name": "First" }),
        json!({ "id": 2, "name": "Second" }),
    ])?;

    let updated = table.update(&Filter::eq("id", 1), &json!({ "id": 3, "name": "Third" }))?;

    assert_eq!(updated, vec![record(json!({ "id": 3, "name": "Third" }))]);
    assert!(table.query_one(&Filter::eq("id", 1))?.is_none());
    assert_eq!(
        table.query(None)?,
        vec![
            record(json!({ "id": 3, "name": "Third" })),
            record(json!({ "id": 2, "name": "Second" })),
        ]
    );
    Ok(())
}

#[test]
fn update_by_predicate_touches_only_matches() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));
    table.insert_many([
        json!({ "id": 1, "name": "First" }),
        json!({ "id": 2, "name": "Second" }),
        json!({ "id": 3, "name": "Third" }),
    ])?;

    let filter = Filter::predicate(|row| row["id"].as_i64().is_some_and(|id| id > 1));
    let updated = table.update(&filter, &json!({ "name": "TEST" }))?;

    assert_eq!(ids(&updated), vec![2, 3]);
    assert_eq!(
        table.query(None)?,
        vec![
            record(json!({ "id": 1, "name": "First" })),
            record(json!({ "id": 2, "name": "TEST" })),
            record(json!({ "id": 3, "name": "TEST" })),
        ]
    );
    Ok(())
}

#[test]
fn update_keeps_field_order() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));
    table.insert(json!({ "id": 1, "name": "First" }))?;

    let updated = table.update(&Filter::eq("id", 1), &json!({ "name": "Renamed" }))?;

    let keys: Vec<&str> = updated[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "name"]);
    Ok(())
}

#[test]
fn invalid_patch_changes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);
    table.insert(json!({ "id": 1, "name": "First" }))?;
    let before = fs::read_to_string(&path)?;

    let res = table.update(&Filter::eq("id", 1), &json!({ "name": "   " }));

    assert!(matches!(res, Err(StoreError::Validation(_))));
    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

#[test]
fn update_without_match_returns_empty() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));
    table.insert(json!({ "id": 1, "name": "First" }))?;

    let updated = table.update(&Filter::eq("id", 99), &json!({ "name": "Nobody" }))?;

    assert!(updated.is_empty());
    assert_eq!(ids(&table.query(None)?), vec![1]);
    Ok(())
}

// --------------------- delete ---------------------

#[test]
fn delete_removes_from_queries_and_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("user.json");
    let mut table = open(&path);
    table.insert_many([
        json!({ "id": 1, "name": "First" }),
        json!({ "id": 2, "name": "Second" }),
        json!({ "id": 3, "name": "Third" }),
    ])?;

    let removed = table.delete(&Filter::eq("id", 2))?;

    assert_eq!(ids(&removed), vec![2]);
    assert_eq!(ids(&table.query(None)?), vec![1, 3]);
    assert_eq!(ids(&read_file(&path)), vec![1, 3]);
    Ok(())
}

#[test]
fn delete_by_predicate_removes_all_matches() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));
    table.insert_many((1..=5).map(|id| json!({ "id": id, "name": format!("n{id}") })))?;

    let removed = table.delete(&Filter::predicate(|row| row["id"].as_i64().unwrap_or(0) % 2 == 0))?;

    assert_eq!(ids(&removed), vec![2, 4]);
    assert_eq!(ids(&table.query(None)?), vec![1, 3, 5]);
    Ok(())
}

#[test]
fn delete_without_match_is_not_an_error() -> Result<()> {
    let dir = tempdir()?;
    let mut table = open(&dir.path().join("user.json"));

    assert!(table.delete(&Filter::eq("id", 1))?.is_empty());
    Ok(())
}
