//! Person record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist individual records and their denormalized NAME facts.
//! - Run the bulk candidate scan as SQL `LIKE` predicates.
//! - Apply NAME fact replacements with an append-only change history.
//!
//! # Invariants
//! - Each write runs in one immediate transaction.
//! - `candidates` selects exactly what `rule::candidate::candidates` selects
//!   for the same population.

use crate::db::DbError;
use crate::model::gedcom::{PersonId, PersonRecord};
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CANDIDATES_SQL: &str = "SELECT p.id
FROM persons p
WHERE EXISTS (
        SELECT 1 FROM person_names n
        WHERE n.person_id = p.id
          AND n.gedcom LIKE '%' || char(10) || '2 NICK _%'
    )
  AND EXISTS (
        SELECT 1 FROM person_names n
        WHERE n.person_id = p.id
          AND n.full_name LIKE '% /%/%'
    )
  AND EXISTS (
        SELECT 1 FROM person_names n
        WHERE n.person_id = p.id
          AND n.full_name NOT LIKE '% \"%\" /%'
    )
ORDER BY p.id ASC;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    PersonNotFound(PersonId),
    NameFactNotFound { person: PersonId, index: u32 },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::NameFactNotFound { person, index } => {
                write!(f, "name fact {index} not found on person {person}")
            }
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::PersonNotFound(_)
            | Self::NameFactNotFound { .. }
            | Self::MissingRequiredTable(_) => None,
        }
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

/// One persisted NAME fact replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChange {
    pub person_id: PersonId,
    pub fact_index: u32,
    pub old_gedcom: String,
    pub new_gedcom: String,
    /// Epoch milliseconds.
    pub changed_at: i64,
}

/// Host record store consumed by the batch fixup.
pub trait RecordStore {
    /// Inserts or replaces one person.
    fn put_person(&mut self, person: &PersonRecord) -> RepoResult<()>;
    fn get_person(&self, id: &str) -> RepoResult<Option<PersonRecord>>;
    /// Coarse superset of persons that might need the nickname fix.
    fn candidates(&self) -> RepoResult<Vec<PersonId>>;
    /// Replaces one NAME fact (by ordinal) with `new_gedcom`.
    fn update_name_fact(&mut self, id: &str, fact_index: u32, new_gedcom: &str)
        -> RepoResult<()>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable` when the schema is not migrated.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["persons", "person_names", "name_changes"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    pub fn count_persons(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Returns the change history of one person, oldest first.
    pub fn name_changes(&self, id: &str) -> RepoResult<Vec<NameChange>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, fact_index, old_gedcom, new_gedcom, changed_at
             FROM name_changes
             WHERE person_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut changes = Vec::new();
        while let Some(row) = rows.next()? {
            changes.push(NameChange {
                person_id: row.get("person_id")?,
                fact_index: row.get("fact_index")?,
                old_gedcom: row.get("old_gedcom")?,
                new_gedcom: row.get("new_gedcom")?,
                changed_at: row.get("changed_at")?,
            });
        }
        Ok(changes)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn put_person(&mut self, person: &PersonRecord) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO persons (id, gedcom) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                gedcom = excluded.gedcom,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![person.id.as_str(), person.gedcom.as_str()],
        )?;
        replace_name_rows(&tx, person)?;
        tx.commit()?;
        Ok(())
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<PersonRecord>> {
        load_person(&*self.conn, id)
    }

    fn candidates(&self) -> RepoResult<Vec<PersonId>> {
        let mut stmt = self.conn.prepare(CANDIDATES_SQL)?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    fn update_name_fact(
        &mut self,
        id: &str,
        fact_index: u32,
        new_gedcom: &str,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let person =
            load_person(&tx, id)?.ok_or_else(|| RepoError::PersonNotFound(id.to_string()))?;
        let not_found = || RepoError::NameFactNotFound {
            person: id.to_string(),
            index: fact_index,
        };
        let old_fact = person.name_fact(fact_index).ok_or_else(not_found)?;
        let updated = person
            .with_name_fact(fact_index, new_gedcom)
            .ok_or_else(not_found)?;

        tx.execute(
            "UPDATE persons
             SET gedcom = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, updated.gedcom.as_str()],
        )?;
        replace_name_rows(&tx, &updated)?;
        tx.execute(
            "INSERT INTO name_changes (person_id, fact_index, old_gedcom, new_gedcom)
             VALUES (?1, ?2, ?3, ?4);",
            params![id, fact_index, old_fact.gedcom.as_str(), new_gedcom],
        )?;
        tx.commit()?;

        info!(
            "event=name_fact_update module=repo status=ok person={} fact_index={}",
            id, fact_index
        );
        Ok(())
    }
}

fn load_person(conn: &Connection, id: &str) -> RepoResult<Option<PersonRecord>> {
    let mut stmt = conn.prepare("SELECT id, gedcom FROM persons WHERE id = ?1;")?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(PersonRecord {
            id: row.get("id")?,
            gedcom: row.get("gedcom")?,
        }));
    }
    Ok(None)
}

fn replace_name_rows(conn: &Connection, person: &PersonRecord) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM person_names WHERE person_id = ?1;",
        [person.id.as_str()],
    )?;
    for fact in person.name_facts() {
        conn.execute(
            "INSERT INTO person_names (person_id, fact_index, gedcom, full_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                person.id.as_str(),
                fact.index,
                fact.gedcom.as_str(),
                fact.value()
            ],
        )?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
