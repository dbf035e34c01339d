//! Task CRUD operations.

use super::{Database, now_timestamp};
use crate::types::{NewTask, Task};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const TASK_COLUMNS: &str = "id, title, description, due_date, completed, created_at";

/// Listing order: open before completed, dated before undated, earliest due
/// date first, then newest first. `id` is unique, so the order is total.
const LIST_ORDER: &str = "completed ASC,
     (due_date IS NULL OR due_date = '') ASC,
     due_date ASC,
     id DESC";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get("id")?;
    let title: String = row.get("title")?;
    let description: Option<String> = row.get("description")?;
    let due_date: Option<String> = row.get("due_date")?;
    let completed: bool = row.get("completed")?;
    let created_at: Option<String> = row.get("created_at")?;

    Ok(Task {
        id,
        title,
        description: description.unwrap_or_default(),
        due_date: due_date.filter(|d| !d.is_empty()),
        completed,
        created_at: created_at.unwrap_or_default(),
    })
}

fn query_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY {LIST_ORDER}"
    ))?;
    let tasks = stmt
        .query_map([], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn query_counts(conn: &Connection) -> Result<(i64, i64)> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(completed != 0), 0) FROM tasks",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}

impl Database {
    /// All tasks in listing order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(query_tasks)
    }

    /// All tasks in listing order with their (total, completed) counts, read
    /// under a single lock so the two always agree.
    pub fn list_tasks_with_counts(&self) -> Result<(Vec<Task>, (i64, i64))> {
        self.with_conn(|conn| Ok((query_tasks(conn)?, query_counts(conn)?)))
    }

    /// Fetch a single task.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let task = conn
                .query_row(
                    &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                    params![id],
                    parse_task_row,
                )
                .optional()?;
            Ok(task)
        })
    }

    /// Insert a new, incomplete task and return its id.
    pub fn create_task(&self, task: &NewTask) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, due_date, completed, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![task.title, task.description, task.due_date, now_timestamp()],
            )?;
            let id = conn.last_insert_rowid();
            debug!(task_id = id, "Created task");
            Ok(id)
        })
    }

    /// Replace title, description and due date. Returns the number of rows
    /// changed; an unknown id changes nothing and is not an error.
    pub fn update_task(&self, id: i64, task: &NewTask) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET title = ?1, description = ?2, due_date = ?3 WHERE id = ?4",
                params![task.title, task.description, task.due_date, id],
            )?;
            debug!(task_id = id, changed, "Updated task");
            Ok(changed)
        })
    }

    /// Set only the completed flag. Unknown ids are a no-op.
    pub fn set_completed(&self, id: i64, completed: bool) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2",
                params![completed, id],
            )?;
            debug!(task_id = id, completed, changed, "Set task completion");
            Ok(changed)
        })
    }

    /// Remove a task. Unknown ids are a no-op.
    pub fn delete_task(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            debug!(task_id = id, changed, "Deleted task");
            Ok(changed)
        })
    }

    /// Task counts as (total, completed).
    pub fn count_tasks(&self) -> Result<(i64, i64)> {
        self.with_conn(query_counts)
    }
}
