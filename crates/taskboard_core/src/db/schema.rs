//! Shape of the `tasks` table as the repository reads and writes it.

use super::{DbError, DbResult};
use rusqlite::Connection;

pub const TASKS_TABLE: &str = "tasks";

/// Columns every task row must carry, in `SELECT` order.
pub const TASK_COLUMNS: [&str; 9] = [
    "uuid",
    "title",
    "description",
    "status",
    "priority",
    "is_public",
    "due_date",
    "created_at",
    "updated_at",
];

/// Checks that `tasks` exists and carries every column in [`TASK_COLUMNS`].
///
/// The first missing column in declaration order is reported.
pub fn verify_task_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([TASKS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if present.is_empty() {
        return Err(DbError::MissingTable(TASKS_TABLE));
    }

    match TASK_COLUMNS
        .into_iter()
        .find(|column| !present.iter().any(|name| name == column))
    {
        Some(column) => Err(DbError::MissingColumn {
            table: TASKS_TABLE,
            column,
        }),
        None => Ok(()),
    }
}
