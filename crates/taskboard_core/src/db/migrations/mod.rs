//! Ordered schema migrations for the task database.
//!
//! Pending steps run in one transaction and the resulting `tasks` table is
//! verified before commit, so a database is either fully upgraded or left
//! at its previous version.

use super::schema::verify_task_schema;
use super::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

// Versions must stay strictly increasing; `user_version` mirrors the last one.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_tasks",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "task_list_indexes",
        sql: include_str!("0002_task_indexes.sql"),
    },
];

/// Outcome of one [`apply_migrations`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Names of the steps this run applied, oldest first.
    pub applied: Vec<&'static str>,
}

impl MigrationReport {
    /// Returns whether the database was already current.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Returns the schema version this build migrates to.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`] and checks the `tasks` table.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `Migration` naming the step whose script failed.
/// - `MissingTable`/`MissingColumn` when the resulting table is incomplete,
///   including databases that claim to be current but were altered.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        verify_task_schema(conn)?;
        return Ok(MigrationReport {
            from_version,
            to_version: from_version,
            applied: Vec::new(),
        });
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        run_step(&tx, migration)?;
    }
    verify_task_schema(&tx)?;
    tx.commit()?;

    let report = MigrationReport {
        from_version,
        to_version: latest,
        applied: pending.iter().map(|migration| migration.name).collect(),
    };
    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        report.from_version,
        report.to_version,
        report.applied.join(",")
    );
    Ok(report)
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    tx.execute_batch(migration.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
        .map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
    info!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        migration.version, migration.name
    );
    Ok(())
}
