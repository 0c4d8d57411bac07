//! Opening the record store.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, a busy timeout, and the
//!   latest schema.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_TARGET: &str = ":memory:";

/// Opens a record store file, creating it when missing, and migrates it.
///
/// # Errors
/// - `Open` when SQLite cannot open the path.
/// - `Migration` or `SchemaTooNew` from the schema check.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_logged(&path.display().to_string(), || Connection::open(path))
}

/// Opens a throwaway in-memory record store and migrates it.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged(IN_MEMORY_TARGET, Connection::open_in_memory)
}

fn open_logged<F>(target: &str, open: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();

    let result = open()
        .map_err(|source| DbError::Open {
            target: target.to_string(),
            source,
        })
        .and_then(|mut conn| {
            prepare(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={} duration_ms={}",
            target,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={} duration_ms={} error={}",
            target,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn prepare(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
