use parcel_core::db::migrations::{apply_migrations, latest_version, user_version};
use parcel_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn).unwrap(), latest_version());
    assert_eq!(
        table_columns(&conn, "parcel"),
        ["number", "client", "status", "address", "created_at"]
    );
    assert!(index_exists(&conn, "idx_parcel_client"));
}

#[test]
fn open_db_sets_busy_timeout() {
    let conn = open_db_in_memory().unwrap();

    let timeout_ms: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout_ms, 5000);
}

#[test]
fn applying_migrations_twice_is_a_noop() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO parcel (client, status, address, created_at)
         VALUES (1, 'registered', 'kept', '2024-01-01T00:00:00Z');",
        [],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM parcel;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.db");

    let first = open_db(&path).unwrap();
    assert_eq!(user_version(&first).unwrap(), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(user_version(&second).unwrap(), latest_version());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn status_column_rejects_unknown_values() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO parcel (client, status, address, created_at)
         VALUES (1, 'lost', 'x', '2024-01-01T00:00:00Z');",
        [],
    );
    assert!(result.is_err());
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    let columns = stmt
        .query_map([table], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    columns
}

fn index_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1);",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}
