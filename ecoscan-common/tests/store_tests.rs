//! Tests for the SQLite-backed key-value store

use ecoscan_common::{KeyValueStore, SqliteStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_created_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("ecoscan.db");

    let result = SqliteStore::open(&db_path).await;
    assert!(result.is_ok(), "Store open failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("ecoscan.db");

    {
        let store = SqliteStore::open(&db_path).await.unwrap();
        store.set("ecoScanHistory", r#"[{"name":"Apple"}]"#).await.unwrap();
    }

    let reopened = SqliteStore::open(&db_path).await.unwrap();
    assert_eq!(
        reopened.get("ecoScanHistory").await.unwrap().as_deref(),
        Some(r#"[{"name":"Apple"}]"#)
    );
}

#[tokio::test]
async fn test_set_replaces_existing_value() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp_dir.path().join("ecoscan.db")).await.unwrap();

    store.set("key", "first").await.unwrap();
    store.set("key", "second").await.unwrap();
    assert_eq!(store.get("key").await.unwrap().as_deref(), Some("second"));

    store.remove("key").await.unwrap();
    assert_eq!(store.get("key").await.unwrap(), None);
}

/// Write a raw value into the settings table behind the store's back
async fn write_raw(db_path: &std::path::Path, value_sql: &str) {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite://{}", db_path.display()))
        .await
        .unwrap();
    sqlx::query(&format!(
        "INSERT OR REPLACE INTO settings (key, value) VALUES ('ecoScanHistory', {})",
        value_sql
    ))
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;
}

#[tokio::test]
async fn test_non_text_value_reads_without_error() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("ecoscan.db");
    let store = SqliteStore::open(&db_path).await.unwrap();

    write_raw(&db_path, "x'FFFE00'").await;
    let value = store.get("ecoScanHistory").await;
    assert!(value.is_ok(), "Blob value failed to read: {:?}", value.err());
    assert!(value.unwrap().is_some());

    write_raw(&db_path, "42").await;
    assert_eq!(store.get("ecoScanHistory").await.unwrap().as_deref(), Some("42"));

    write_raw(&db_path, "NULL").await;
    assert_eq!(store.get("ecoScanHistory").await.unwrap(), None);

    // Normal writes still replace the garbage
    store.set("ecoScanHistory", "[]").await.unwrap();
    assert_eq!(store.get("ecoScanHistory").await.unwrap().as_deref(), Some("[]"));
}
