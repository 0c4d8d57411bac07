//! Nickname data-fix driver.
//!
//! # Responsibility
//! - Enumerate work with the store's coarse candidate scan.
//! - Confirm each candidate with the exact per-name rule.
//! - Render previews and apply fact updates through the store.
//!
//! # Invariants
//! - Nothing is written for a person the per-name rule does not flag.
//! - Each fact update is independent; a failure leaves earlier updates
//!   persisted.

use crate::model::gedcom::{split_individuals, GedcomError, PersonId, PersonRecord};
use crate::repo::person_repo::{RecordStore, RepoError, RepoResult};
use crate::rule::person::{person_needs_update, preview_update, update_person};
use crate::rule::preview::{DiffRenderer, LineDiff};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for import and fixup use-cases.
#[derive(Debug)]
pub enum DataFixError {
    Gedcom(GedcomError),
    Repo(RepoError),
}

impl Display for DataFixError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gedcom(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DataFixError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gedcom(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<GedcomError> for DataFixError {
    fn from(value: GedcomError) -> Self {
        Self::Gedcom(value)
    }
}

impl From<RepoError> for DataFixError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Rendered before/after view for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonPreview {
    pub person_id: PersonId,
    pub diff: String,
}

/// Outcome of one `apply` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataFixSummary {
    /// Persons selected by the coarse scan.
    pub candidates: usize,
    pub persons_updated: usize,
    pub names_updated: usize,
}

/// Use-case service wrapping a record store and a diff renderer.
pub struct DataFixService<S: RecordStore, D: DiffRenderer = LineDiff> {
    store: S,
    renderer: D,
}

impl<S: RecordStore> DataFixService<S> {
    /// Creates a service that renders previews with `LineDiff`.
    pub fn new(store: S) -> Self {
        Self::with_renderer(store, LineDiff)
    }
}

impl<S: RecordStore, D: DiffRenderer> DataFixService<S, D> {
    pub fn with_renderer(store: S, renderer: D) -> Self {
        Self { store, renderer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads every INDI record of a GEDCOM document into the store.
    ///
    /// Returns the number of persons written.
    pub fn import(&mut self, document: &str) -> Result<usize, DataFixError> {
        let started_at = Instant::now();
        let persons = split_individuals(document)?;
        for person in &persons {
            self.store.put_person(person)?;
        }
        info!(
            "event=gedcom_import module=service status=ok persons={} duration_ms={}",
            persons.len(),
            started_at.elapsed().as_millis()
        );
        Ok(persons.len())
    }

    /// Coarse superset of persons that might need the fix.
    pub fn candidates(&self) -> RepoResult<Vec<PersonId>> {
        self.store.candidates()
    }

    /// Returns the candidates the per-name rule confirms, in candidate order.
    pub fn records_to_fix(&self) -> RepoResult<Vec<PersonRecord>> {
        self.scan().map(|(_, confirmed)| confirmed)
    }

    /// One candidate scan; returns the candidate count and the confirmed
    /// records.
    fn scan(&self) -> RepoResult<(usize, Vec<PersonRecord>)> {
        let started_at = Instant::now();
        let candidates = self.store.candidates()?;
        let mut confirmed = Vec::new();

        for id in &candidates {
            match self.store.get_person(id)? {
                Some(person) if person_needs_update(&person) => confirmed.push(person),
                Some(_) => {}
                None => warn!(
                    "event=data_fix_scan module=service status=skip reason=candidate_vanished person={}",
                    id
                ),
            }
        }

        info!(
            "event=data_fix_scan module=service status=ok candidates={} confirmed={} duration_ms={}",
            candidates.len(),
            confirmed.len(),
            started_at.elapsed().as_millis()
        );
        Ok((candidates.len(), confirmed))
    }

    /// Renders the fix for one person.
    ///
    /// Returns `None` when the person needs no update.
    ///
    /// # Errors
    /// - Returns `PersonNotFound` when the id is unknown.
    pub fn preview(&self, id: &str) -> RepoResult<Option<PersonPreview>> {
        let person = self
            .store
            .get_person(id)?
            .ok_or_else(|| RepoError::PersonNotFound(id.to_string()))?;
        Ok(self.render(&person))
    }

    /// Renders the fix for every confirmed candidate.
    pub fn previews(&self) -> RepoResult<Vec<PersonPreview>> {
        Ok(self
            .records_to_fix()?
            .iter()
            .filter_map(|person| self.render(person))
            .collect())
    }

    /// Applies the fix to one person and returns the number of names
    /// rewritten.
    ///
    /// # Errors
    /// - Returns `PersonNotFound` when the id is unknown.
    pub fn fix_person(&mut self, id: &str) -> RepoResult<usize> {
        let person = self
            .store
            .get_person(id)?
            .ok_or_else(|| RepoError::PersonNotFound(id.to_string()))?;
        self.apply_updates(&person)
    }

    /// Applies the fix to every confirmed candidate.
    pub fn apply(&mut self) -> RepoResult<DataFixSummary> {
        let started_at = Instant::now();
        let (candidates, confirmed) = self.scan()?;
        let mut summary = DataFixSummary {
            candidates,
            ..DataFixSummary::default()
        };

        for person in confirmed {
            let names = self.apply_updates(&person)?;
            if names > 0 {
                summary.persons_updated += 1;
                summary.names_updated += names;
            }
        }

        info!(
            "event=data_fix_apply module=service status=ok candidates={} persons_updated={} names_updated={} duration_ms={}",
            summary.candidates,
            summary.persons_updated,
            summary.names_updated,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }

    fn render(&self, person: &PersonRecord) -> Option<PersonPreview> {
        let preview = preview_update(person);
        if preview.is_unchanged() {
            return None;
        }
        Some(PersonPreview {
            person_id: person.id.clone(),
            diff: preview.render(&self.renderer),
        })
    }

    fn apply_updates(&mut self, person: &PersonRecord) -> RepoResult<usize> {
        let updates = update_person(person);
        for update in &updates {
            self.store
                .update_name_fact(&person.id, update.index, &update.new_gedcom)?;
        }
        Ok(updates.len())
    }
}
