//! Migration tests

use songbook_storage::Database;
use tests::db::TestDatabase;

#[test]
fn test_migrations_run_successfully() {
    // Database::open runs migrations automatically
    let test_db = TestDatabase::new();

    assert!(test_db.db_path().exists());
    assert_eq!(test_db.db.schema_version(), 1);
}

#[test]
fn test_migrations_are_idempotent() {
    let test_db = TestDatabase::new();

    // Opening the same database again should not re-run anything
    let db2 = Database::open(test_db.db_path()).expect("Failed to reopen database");
    assert_eq!(db2.schema_version(), 1);
}

#[test]
fn test_database_creates_parent_directory() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("data").join("songbook.db");

    assert!(!db_path.exists());
    let _db = Database::open(&db_path).expect("Failed to open database");
    assert!(db_path.exists());
}

#[test]
fn test_in_memory_database() {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    assert_eq!(db.schema_version(), 1);
}
