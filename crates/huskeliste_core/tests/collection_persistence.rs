use huskeliste_core::db::migrations::latest_version;
use huskeliste_core::db::open_db_in_memory;
use huskeliste_core::{
    Collection, CollectionRepository, RepoError, SqliteCollectionRepository, STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn load_without_stored_value_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();

    assert_eq!(repo.load().unwrap(), None);
}

#[test]
fn save_then_load_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();

    let board = Collection::seed().add_item(1, "Melk").add_item(2, "Ved");
    repo.save(&board).unwrap();

    let loaded = repo.load().unwrap().unwrap();
    assert_eq!(loaded, board);
}

#[test]
fn save_replaces_the_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();

    let first = Collection::seed().add_item(1, "Melk");
    repo.save(&first).unwrap();

    let second = first.select_list(3);
    repo.save(&second).unwrap();

    assert_eq!(repo.load().unwrap().unwrap(), second);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn stored_value_is_plain_json_under_the_fixed_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();

    let board = Collection::seed().add_item(1, "Melk");
    repo.save(&board).unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["active_list"], 1);
    assert_eq!(value["lists"][0]["todos"][0]["text"], "Melk");
    // Numeric ids stay numbers on the wire.
    assert!(value["lists"][0]["todos"][0]["id"].is_i64());
}

#[test]
fn load_rejects_a_corrupt_stored_value() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        [STORAGE_KEY, "not json at all"],
    )
    .unwrap();

    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();
    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(err.to_string().contains(STORAGE_KEY));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCollectionRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCollectionRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("kv_store"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_kv_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCollectionRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "kv_store",
            column: "updated_at"
        })
    ));
}
