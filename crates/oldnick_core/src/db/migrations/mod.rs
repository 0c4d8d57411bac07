//! Schema steps for the record store.
//!
//! Each step runs in its own transaction together with its
//! `user_version` bump, so a failing step leaves the store at the last
//! version that applied cleanly.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// `(version, sql)`; versions ascend without gaps.
const SCHEMA_STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_persons.sql")),
    (2, include_str!("0002_name_changes.sql")),
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |&(version, _)| version)
}

/// Schema version recorded in the store.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the store up to `latest_version`.
///
/// # Errors
/// - `SchemaTooNew` when the store is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    for &(version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > found) {
        apply_step(conn, version, sql).map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} error={}",
                version, source
            );
            DbError::Migration { version, source }
        })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    Ok(())
}

fn apply_step(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}
