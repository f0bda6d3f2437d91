//! Task database: connection bootstrap, schema migrations and the `tasks`
//! table contract the repository relies on.
//!
//! # Invariants
//! - `PRAGMA user_version` records the last applied migration.
//! - A connection leaves `open_db*` only after every pending migration ran
//!   and the `tasks` table passed [`schema::verify_task_schema`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use migrations::MigrationReport;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or checking the task database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer taskboard build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// One migration script failed; the whole batch was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "task database is at schema v{db_version}; this build only knows up to v{latest_supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "task migration v{version} `{name}` failed: {source}"),
            Self::MissingTable(table) => write!(f, "task schema is missing table `{table}`"),
            Self::MissingColumn { table, column } => {
                write!(f, "task schema is missing column `{table}.{column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
