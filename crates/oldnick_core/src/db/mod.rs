//! Record store bootstrap: open, configure and migrate the SQLite file that
//! hosts person records during a fixup run.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A connection is handed out only after every migration has applied.
//! - `person_names` and `name_changes` rows die with their `persons` row.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why a record store could not be brought up.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused to open `target` (a file path or `:memory:`).
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Pragma setup or a store query failed.
    Sqlite(rusqlite::Error),
    /// Migration `version` failed; the store stays at its previous version.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open record store `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Migration { version, source } => {
                write!(f, "record store migration v{version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "record store schema v{found} is newer than this build supports (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
