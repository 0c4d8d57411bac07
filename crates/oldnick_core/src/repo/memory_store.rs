//! In-memory record store.
//!
//! Runs the candidate scan with the regex rendition of the filter. Used by
//! embedders that keep records in memory and by tests that need a host
//! without SQLite.

use crate::model::gedcom::{PersonId, PersonRecord};
use crate::repo::person_repo::{RecordStore, RepoError, RepoResult};
use crate::rule::candidate::candidates;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    persons: BTreeMap<PersonId, PersonRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

impl FromIterator<PersonRecord> for MemoryRecordStore {
    fn from_iter<T: IntoIterator<Item = PersonRecord>>(iter: T) -> Self {
        Self {
            persons: iter
                .into_iter()
                .map(|person| (person.id.clone(), person))
                .collect(),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn put_person(&mut self, person: &PersonRecord) -> RepoResult<()> {
        self.persons.insert(person.id.clone(), person.clone());
        Ok(())
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<PersonRecord>> {
        Ok(self.persons.get(id).cloned())
    }

    fn candidates(&self) -> RepoResult<Vec<PersonId>> {
        Ok(candidates(self.persons.values()).into_iter().collect())
    }

    fn update_name_fact(
        &mut self,
        id: &str,
        fact_index: u32,
        new_gedcom: &str,
    ) -> RepoResult<()> {
        let person = self
            .persons
            .get_mut(id)
            .ok_or_else(|| RepoError::PersonNotFound(id.to_string()))?;
        *person = person
            .with_name_fact(fact_index, new_gedcom)
            .ok_or_else(|| RepoError::NameFactNotFound {
                person: id.to_string(),
                index: fact_index,
            })?;
        Ok(())
    }
}
