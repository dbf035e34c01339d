//! Schema creation and additive upgrades for the tasks table.

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use super::Database;

/// Columns added after the first release, with the DDL used to add them.
///
/// Each entry is applied only when its column is missing, so the checks are
/// independent of one another and of the order they run in.
const OPTIONAL_COLUMNS: &[(&str, &str)] = &[
    ("completed", "completed INTEGER NOT NULL DEFAULT 0"),
    ("due_date", "due_date TEXT"),
];

/// Column definitions of the current tasks table.
const TASKS_TABLE_BODY: &str = "
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    due_date TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
";

/// Information about a table column.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Create the tasks table if needed, add any missing optional columns and
/// rebuild a table created without AUTOINCREMENT.
///
/// Safe to run on every startup.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!("CREATE TABLE IF NOT EXISTS tasks ({TASKS_TABLE_BODY});"))?;

    let existing: Vec<String> = table_columns(conn, "tasks")?
        .into_iter()
        .map(|c| c.name)
        .collect();

    for (name, ddl) in OPTIONAL_COLUMNS {
        if !existing.iter().any(|c| c == name) {
            info!(column = name, "Adding missing column to tasks table");
            conn.execute_batch(&format!("ALTER TABLE tasks ADD COLUMN {ddl};"))?;
        }
    }

    if !uses_autoincrement(conn)? {
        rebuild_with_autoincrement(conn)?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_tasks_listing ON tasks (completed, due_date);",
    )?;

    Ok(())
}

/// Whether the stored tasks table never hands out a deleted id again.
fn uses_autoincrement(conn: &Connection) -> Result<bool> {
    let sql: String = conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
        [],
        |row| row.get(0),
    )?;
    Ok(sql.to_ascii_uppercase().contains("AUTOINCREMENT"))
}

/// Copy a table created without AUTOINCREMENT into the current definition.
///
/// Rows keep their ids, so the id sequence starts after the highest id
/// present at upgrade time. Ids deleted above that point before the upgrade
/// are not recoverable.
fn rebuild_with_autoincrement(conn: &Connection) -> Result<()> {
    info!("Rebuilding tasks table so deleted ids are never reused");
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "ALTER TABLE tasks RENAME TO tasks_legacy;
         CREATE TABLE tasks ({TASKS_TABLE_BODY});
         INSERT INTO tasks (id, title, description, due_date, completed, created_at)
             SELECT id,
                    title,
                    COALESCE(description, ''),
                    due_date,
                    COALESCE(completed, 0),
                    COALESCE(created_at, CURRENT_TIMESTAMP)
             FROM tasks_legacy;
         DROP TABLE tasks_legacy;"
    ))?;
    tx.commit()?;
    Ok(())
}

/// Column details for a table, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)",
    )?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
                nullable: row.get::<_, i32>(2)? == 0,
                default_value: row.get(3)?,
                primary_key: row.get::<_, i32>(4)? > 0,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

impl Database {
    /// Column details for a table in this database.
    pub fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.with_conn(|conn| table_columns(conn, table))
    }
}
