// Migrations are forward-only. Never edit or reorder one after it ships.

use rusqlite::{Connection, TransactionBehavior};
use shelf_application::ApplicationError;
use tracing::info;

pub const MIGRATIONS: &[&str] = &[
    // 1: record table
    r#"
    CREATE TABLE file_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(name) > 0),
        mime_type TEXT NOT NULL DEFAULT '',
        size_bytes INTEGER NOT NULL CHECK (size_bytes >= 0),
        created_at_ms INTEGER NOT NULL,
        payload BLOB NOT NULL
    );
    "#,
    // 2: chronological listing
    r#"
    CREATE INDEX idx_file_records_created ON file_records(created_at_ms, id);
    "#,
];

pub fn target_version() -> u32 {
    MIGRATIONS.len() as u32
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Brings the schema up to `target_version`. The version is re-read under a
/// write lock, so concurrent openers apply each migration exactly once.
pub fn run_migrations(conn: &mut Connection) -> Result<u32, ApplicationError> {
    let target = target_version();
    let current = schema_version(conn).map_err(upgrade_failed)?;
    check_supported(current, target)?;
    if current == target {
        return Ok(current);
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(upgrade_failed)?;
    let current = schema_version(&tx).map_err(upgrade_failed)?;
    check_supported(current, target)?;

    for (index, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index as u32 + 1;
        tx.execute_batch(migration).map_err(|error| {
            ApplicationError::SchemaUpgradeFailed(format!("migration {version}: {error}"))
        })?;
        tx.execute_batch(&format!("PRAGMA user_version = {version}"))
            .map_err(upgrade_failed)?;
        info!(version, "applied migration");
    }

    tx.commit().map_err(upgrade_failed)?;
    Ok(target)
}

fn check_supported(current: u32, target: u32) -> Result<(), ApplicationError> {
    if current > target {
        return Err(ApplicationError::SchemaUpgradeFailed(format!(
            "database schema version {current} is newer than this build supports (max {target})"
        )));
    }
    Ok(())
}

fn upgrade_failed(error: rusqlite::Error) -> ApplicationError {
    ApplicationError::SchemaUpgradeFailed(error.to_string())
}
