//! Task CRUD, always scoped to the owning user.

use super::{Database, millis_to_utc, now_ms};
use crate::types::{NewTask, Task, TaskUpdate};
use anyhow::{Result, anyhow};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, category, priority, completed, due_date, created_at, updated_at";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let category: String = row.get(4)?;
    let priority: String = row.get(5)?;
    let due_date: Option<i64> = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: category
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        priority: priority
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
        completed: row.get(6)?,
        due_date: due_date.map(|ms| millis_to_utc(7, ms)).transpose()?,
        created_at: millis_to_utc(8, row.get(8)?)?,
        updated_at: millis_to_utc(9, row.get(9)?)?,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, user_id: &str, task_id: &str) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
            params![task_id, user_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

/// Write every mutable column of `task` back, keyed by id and owner.
fn write_task(conn: &Connection, task: &Task) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET title = ?1, description = ?2, category = ?3, priority = ?4,
                completed = ?5, due_date = ?6, updated_at = ?7
         WHERE id = ?8 AND user_id = ?9",
        params![
            task.title,
            task.description,
            task.category.as_str(),
            task.priority.as_str(),
            task.completed,
            task.due_date.map(|d| d.timestamp_millis()),
            task.updated_at.timestamp_millis(),
            task.id,
            task.user_id,
        ],
    )?;
    Ok(())
}

impl Database {
    /// Create a task owned by `user_id`.
    pub fn create_task(&self, user_id: &str, new: &NewTask) -> Result<Task> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            let now = now_ms();

            conn.execute(
                "INSERT INTO tasks (id, user_id, title, description, category, priority,
                                    completed, due_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?8)",
                params![
                    id,
                    user_id,
                    new.title,
                    new.description,
                    new.category.as_str(),
                    new.priority.as_str(),
                    new.due_date.map(|d| d.timestamp_millis()),
                    now,
                ],
            )?;

            get_task_internal(conn, user_id, &id)?
                .ok_or_else(|| anyhow!("task {} missing after insert", id))
        })
    }

    /// All of a user's tasks, newest first.
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let tasks = stmt
                .query_map(params![user_id], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Get one task. `None` when it does not exist or belongs to someone else.
    pub fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, user_id, task_id))
    }

    /// Apply a partial update. `None` when the task is missing or not owned.
    pub fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut task) = get_task_internal(&tx, user_id, task_id)? else {
                return Ok(None);
            };

            update.apply_to(&mut task);
            task.updated_at = millis_to_utc(9, now_ms())?;
            write_task(&tx, &task)?;

            tx.commit()?;
            Ok(Some(task))
        })
    }

    /// Flip the completed flag. `None` when the task is missing or not owned.
    pub fn toggle_task(&self, user_id: &str, task_id: &str) -> Result<Option<Task>> {
        let update = |completed: bool| TaskUpdate {
            completed: Some(!completed),
            ..TaskUpdate::default()
        };
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut task) = get_task_internal(&tx, user_id, task_id)? else {
                return Ok(None);
            };

            update(task.completed).apply_to(&mut task);
            task.updated_at = millis_to_utc(9, now_ms())?;
            write_task(&tx, &task)?;

            tx.commit()?;
            Ok(Some(task))
        })
    }

    /// Delete a task. Returns whether a task owned by `user_id` was removed.
    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![task_id, user_id],
            )?;
            Ok(deleted > 0)
        })
    }
}
