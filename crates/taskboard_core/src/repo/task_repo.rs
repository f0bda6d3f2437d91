//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filter-by-status APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is `created_at DESC`, newest insert first on ties.

use crate::db::schema::verify_task_schema;
use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus, TaskValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    status,
    priority,
    is_public,
    due_date,
    created_at,
    updated_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Persists every field of `task` except `id` and `created_at`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks newest first, optionally restricted to one status.
    fn list_tasks(&self, status: Option<TaskStatus>) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Deletes every listed task that exists; returns the removed row count.
    fn delete_tasks(&self, ids: &[TaskId]) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `Db(DbError::MissingTable | DbError::MissingColumn)` when the
    ///   connection was not opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_task_schema(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                description,
                status,
                priority,
                is_public,
                due_date,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                bool_to_int(task.is_public),
                task.due_date,
                task.created_at,
                task.updated_at,
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                status = ?3,
                priority = ?4,
                is_public = ?5,
                due_date = ?6,
                updated_at = ?7
             WHERE uuid = ?8;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                bool_to_int(task.is_public),
                task.due_date,
                task.updated_at,
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, status: Option<TaskStatus>) -> RepoResult<Vec<Task>> {
        // `?1` is NULL when every status is listed.
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([status.map(TaskStatus::as_str)])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_tasks(&self, ids: &[TaskId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM tasks WHERE uuid IN ({placeholders});");
        let bind_values = ids.iter().map(|id| Value::Text(id.to_string()));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let is_public = match row.get::<_, i64>("is_public")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_public value `{other}` in tasks.is_public"
            )));
        }
    };

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        is_public,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    task.validate()?;
    Ok(task)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
