//! Tests for schema creation and upgrade of older database files.

use rusqlite::Connection;
use tasklist::db::Database;
use tasklist::db::schema::ensure_schema;
use tasklist::types::NewTask;

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn column_names(db: &Database) -> Vec<String> {
    db.table_columns("tasks")
        .expect("Failed to read columns")
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn fresh_database_has_all_columns() {
    let db = setup_db();
    assert_eq!(
        column_names(&db),
        vec!["id", "title", "description", "due_date", "completed", "created_at"]
    );

    let columns = db.table_columns("tasks").unwrap();
    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert!(id.primary_key);
    let completed = columns.iter().find(|c| c.name == "completed").unwrap();
    assert!(!completed.nullable);
    assert_eq!(completed.default_value.as_deref(), Some("0"));
}

#[test]
fn ensure_schema_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).unwrap();
    ensure_schema(&conn).unwrap();
    ensure_schema(&conn).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('tasks') WHERE name = 'completed'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn legacy_file_gains_missing_columns_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO tasks (title, description) VALUES ('old task', NULL);",
        )
        .unwrap();
    }

    let db = Database::open(&path).expect("Failed to open legacy database");
    let names = column_names(&db);
    assert!(names.contains(&"completed".to_string()));
    assert!(names.contains(&"due_date".to_string()));

    let tasks = db.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "old task");
    assert_eq!(tasks[0].description, "");
    assert_eq!(tasks[0].due_date, None);
    assert!(!tasks[0].completed);

    let id = db
        .create_task(&NewTask::new("new task").with_due_date("2024-01-01"))
        .unwrap();
    let ordered: Vec<i64> = db.list_tasks().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ordered, vec![id, tasks[0].id]);
}

#[test]
fn partially_upgraded_file_gets_only_what_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                due_date TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO tasks (title, due_date) VALUES ('dated', '2024-02-02');",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let task = db.list_tasks().unwrap().remove(0);
    assert_eq!(task.due_date.as_deref(), Some("2024-02-02"));
    assert!(!task.completed);

    // Reopening runs the checks again without changes.
    drop(db);
    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_tasks().unwrap().len(), 1);
}

#[test]
fn table_without_autoincrement_is_rebuilt_and_never_reuses_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain-pk.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                created_at TEXT
            );
            INSERT INTO tasks (id, title, description, created_at)
                VALUES (3, 'kept', 'notes', '2023-01-01T00:00:00Z');
            INSERT INTO tasks (id, title) VALUES (5, 'newest');",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let sql: String = db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
                [],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    assert!(sql.contains("AUTOINCREMENT"));

    let kept = db.get_task(3).unwrap().expect("row survives rebuild");
    assert_eq!(kept.title, "kept");
    assert_eq!(kept.description, "notes");
    assert_eq!(kept.created_at, "2023-01-01T00:00:00Z");
    assert!(!kept.completed);
    let newest = db.get_task(5).unwrap().expect("row survives rebuild");
    assert!(!newest.created_at.is_empty());

    db.delete_task(5).unwrap();
    let id = db.create_task(&NewTask::new("after delete")).unwrap();
    assert!(id > 5);

    // A second open finds the table already rebuilt.
    drop(db);
    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_tasks().unwrap().len(), 2);
}

#[test]
fn open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("tasks.db");

    let db = Database::open(&path).unwrap();
    db.create_task(&NewTask::new("persisted")).unwrap();
    drop(db);

    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_tasks().unwrap()[0].title, "persisted");
}
