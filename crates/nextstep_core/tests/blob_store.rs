use nextstep_core::db::{open_db, open_db_in_memory};
use nextstep_core::{now_epoch_ms, BlobStore, RepoError, SqliteBlobStore, BLOB_SCHEMA_VERSION};
use rusqlite::Connection;

#[test]
fn try_new_creates_schema_on_a_raw_connection() {
    let store = SqliteBlobStore::try_new(Connection::open_in_memory().unwrap()).unwrap();

    assert_eq!(schema_version(store.connection()), BLOB_SCHEMA_VERSION);
    assert_table_exists(store.connection(), "blobs");
    assert!(store.get("todos").unwrap().is_none());
}

#[test]
fn reopening_same_file_keeps_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("nextstep.db");

    let first = SqliteBlobStore::try_new(open_db(&path).unwrap()).unwrap();
    first.put("todos", b"[]").unwrap();
    drop(first);

    let second = SqliteBlobStore::try_new(open_db(&path).unwrap()).unwrap();
    assert_eq!(schema_version(second.connection()), BLOB_SCHEMA_VERSION);
    assert_eq!(second.get("todos").unwrap().as_deref(), Some(&b"[]"[..]));
}

#[test]
fn newer_schema_version_is_rejected_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteBlobStore::try_new(open_db(&path).unwrap()) {
        Err(RepoError::UnsupportedSchemaVersion { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, BLOB_SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unsupported schema version error"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 999);
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'blobs';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn put_upserts_one_row_per_key() {
    let store = SqliteBlobStore::try_new(open_db_in_memory().unwrap()).unwrap();

    store.put("todos", b"first").unwrap();
    store.put("todos", b"second").unwrap();
    store.put("archive", b"old").unwrap();

    assert_eq!(store.get("todos").unwrap().as_deref(), Some(&b"second"[..]));
    assert_eq!(store.get("archive").unwrap().as_deref(), Some(&b"old"[..]));
    assert_eq!(row_count(store.connection(), "todos"), 1);
    assert_eq!(row_count(store.connection(), "archive"), 1);
}

#[test]
fn put_moves_updated_at_forward() {
    let store = SqliteBlobStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let before = now_epoch_ms();

    store.put("todos", b"first").unwrap();
    let first = updated_at(store.connection(), "todos");
    assert!(first >= before);

    store
        .connection()
        .execute("UPDATE blobs SET updated_at = 0 WHERE key = 'todos';", [])
        .unwrap();
    store.put("todos", b"second").unwrap();

    let second = updated_at(store.connection(), "todos");
    assert!(second >= first);
    assert!(second > 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table} should exist");
}

fn row_count(conn: &Connection, key: &str) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM blobs WHERE key = ?1;", [key], |row| {
        row.get(0)
    })
    .unwrap()
}

fn updated_at(conn: &Connection, key: &str) -> i64 {
    conn.query_row(
        "SELECT updated_at FROM blobs WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .unwrap()
}
