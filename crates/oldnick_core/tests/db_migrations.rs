use oldnick_core::db::migrations::{apply_migrations, latest_version, schema_version};
use oldnick_core::db::{open_db, open_db_in_memory, DbError};
use oldnick_core::{PersonRecord, RecordStore, RepoError, SqliteRecordStore};
use rusqlite::Connection;

#[test]
fn person_names_is_keyed_by_person_and_fact_ordinal() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(
        columns(&conn, "person_names"),
        vec![
            ("person_id".to_string(), 1),
            ("fact_index".to_string(), 2),
            ("gedcom".to_string(), 0),
            ("full_name".to_string(), 0),
        ]
    );
}

#[test]
fn name_changes_keeps_both_fact_texts() {
    let conn = open_db_in_memory().unwrap();

    let names: Vec<String> = columns(&conn, "name_changes")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        vec![
            "id",
            "person_id",
            "fact_index",
            "old_gedcom",
            "new_gedcom",
            "changed_at"
        ]
    );
    let index_exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = 'idx_name_changes_person');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(index_exists, 1);
}

#[test]
fn child_tables_cascade_from_persons() {
    let conn = open_db_in_memory().unwrap();

    for table in ["person_names", "name_changes"] {
        let (parent, from, on_delete): (String, String, String) = conn
            .query_row(
                "SELECT \"table\", \"from\", on_delete FROM pragma_foreign_key_list(?1);",
                [table],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(parent, "persons", "{table}");
        assert_eq!(from, "person_id", "{table}");
        assert_eq!(on_delete, "CASCADE", "{table}");
    }

    conn.execute_batch(
        "INSERT INTO persons (id, gedcom) VALUES ('I1', '0 @I1@ INDI\n1 NAME John /Smith/');
         INSERT INTO person_names (person_id, fact_index, gedcom, full_name)
             VALUES ('I1', 0, '1 NAME John /Smith/', 'John /Smith/');
         INSERT INTO name_changes (person_id, fact_index, old_gedcom, new_gedcom)
             VALUES ('I1', 0, '1 NAME John /Smith/', '1 NAME John \"Jack\" /Smith/');
         DELETE FROM persons WHERE id = 'I1';",
    )
    .unwrap();

    assert_eq!(row_count(&conn, "person_names"), 0);
    assert_eq!(row_count(&conn, "name_changes"), 0);
}

#[test]
fn dangling_name_rows_are_rejected() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO person_names (person_id, fact_index, gedcom, full_name)
         VALUES ('I404', 0, '1 NAME A /B/', 'A /B/');",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn reopened_store_keeps_persons() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.db");

    {
        let mut conn = open_db(&path).unwrap();
        let mut store = SqliteRecordStore::try_new(&mut conn).unwrap();
        store
            .put_person(&PersonRecord::new(
                "I1",
                "0 @I1@ INDI\n1 NAME John /Smith/\n2 NICK Jack",
            ))
            .unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let store = SqliteRecordStore::try_new(&mut conn).unwrap();
    assert_eq!(store.candidates().unwrap(), vec!["I1".to_string()]);
}

#[test]
fn store_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_migration_names_its_version_and_rolls_back() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE persons (id TEXT PRIMARY KEY);")
        .unwrap();

    match apply_migrations(&mut conn).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 1),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(schema_version(&conn).unwrap(), 0);
    assert_eq!(columns(&conn, "person_names"), Vec::new());
}

#[test]
fn unopenable_path_is_reported_with_its_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tree.db");

    match open_db(&path).unwrap_err() {
        DbError::Open { target, .. } => assert!(target.ends_with("tree.db"), "{target}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteRecordStore::try_new(&mut conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("persons")));
}

fn columns(conn: &Connection, table: &str) -> Vec<(String, i64)> {
    let mut stmt = conn
        .prepare("SELECT name, pk FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    let rows = stmt
        .query_map([table], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap();
    rows.collect::<Result<_, _>>().unwrap()
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
