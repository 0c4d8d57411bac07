//! Core of the old-nicknames data fix.
//!
//! Finds GEDCOM names that carry a `NICK` sub-field but do not quote the
//! nickname in the display name, and rewrites `John /Smith/` into
//! `John "Jack" /Smith/`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::gedcom::{split_individuals, GedcomError, NameFact, PersonId, PersonRecord};
pub use model::name::NameRecord;
pub use repo::memory_store::MemoryRecordStore;
pub use repo::person_repo::{NameChange, RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use rule::candidate::{candidates, is_candidate};
pub use rule::nickname::{needs_update, rewrite};
pub use rule::person::{
    fact_needs_update, person_needs_update, preview_update, rewrite_name_fact, update_person,
    NameFactUpdate, NamePreview,
};
pub use rule::preview::{DiffRenderer, LineDiff};
pub use service::data_fix_service::{
    DataFixError, DataFixService, DataFixSummary, PersonPreview,
};

