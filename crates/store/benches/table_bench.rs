use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use schema::user_schema;
use serde_json::{json, Value};
use store::{Filter, JsonTable};
use tempfile::tempdir;

const N_ROWS: usize = 1_000;

fn user(i: usize) -> Value {
    json!({
        "id": i + 1,
        "name": format!("User {}", i),
        "username": format!("user_{}", i),
        "email": format!("user{}@example.com", i),
    })
}

fn insert_benchmark(c: &mut Criterion) {
    c.bench_function("table_insert_many_1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let table = JsonTable::new(dir.path().join("user.json"), user_schema());
                (dir, table)
            },
            |(_dir, mut table)| {
                table.insert_many((0..N_ROWS).map(user)).unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

fn query_benchmark(c: &mut Criterion) {
    c.bench_function("table_query_one_by_email_1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let mut table = JsonTable::new(dir.path().join("user.json"), user_schema());
                table.insert_many((0..N_ROWS).map(user)).unwrap();
                (dir, table)
            },
            |(_dir, mut table)| {
                let filter = Filter::eq("email", format!("user{}@example.com", N_ROWS - 1));
                assert!(table.query_one(&filter).unwrap().is_some());
            },
            BatchSize::LargeInput,
        );
    });
}

fn update_benchmark(c: &mut Criterion) {
    c.bench_function("table_update_single_1k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let mut table = JsonTable::new(dir.path().join("user.json"), user_schema());
                table.insert_many((0..N_ROWS).map(user)).unwrap();
                (dir, table)
            },
            |(_dir, mut table)| {
                let updated = table
                    .update(&Filter::eq("id", 500), &json!({ "name": "Renamed" }))
                    .unwrap();
                assert_eq!(updated.len(), 1);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, insert_benchmark, query_benchmark, update_benchmark);
criterion_main!(benches);
