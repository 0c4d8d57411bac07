//! Person-level application of the nickname rule.
//!
//! # Responsibility
//! - Evaluate every NAME fact of a person independently.
//! - Build the fact replacements the host store persists.
//! - Build before/after previews of those replacements.
//!
//! # Invariants
//! - A person needs an update iff at least one NAME fact does.
//! - Previews and updates agree: a fact shown as changed is exactly a fact
//!   that `update_person` returns.

use crate::model::gedcom::{NameFact, PersonRecord};
use crate::rule::nickname::{needs_update, rewrite};
use crate::rule::preview::DiffRenderer;

/// One NAME fact replacement for the host record-update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFactUpdate {
    /// Field id of the fact within its person.
    pub index: u32,
    pub old_gedcom: String,
    pub new_gedcom: String,
}

/// Joined NAME fact text of one person, before and after the fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePreview {
    pub old: String,
    pub new: String,
}

impl NamePreview {
    pub fn is_unchanged(&self) -> bool {
        self.old == self.new
    }

    pub fn render(&self, renderer: &impl DiffRenderer) -> String {
        renderer.render(&self.old, &self.new)
    }
}

pub fn fact_needs_update(fact: &NameFact) -> bool {
    needs_update(&fact.record())
}

/// Returns the fact text with its NAME value rewritten.
///
/// Unchanged when the fact has no nickname.
pub fn rewrite_name_fact(fact: &NameFact) -> String {
    fact.with_value(&rewrite(&fact.record()))
}

pub fn person_needs_update(person: &PersonRecord) -> bool {
    person.name_facts().iter().any(fact_needs_update)
}

/// Returns a replacement for every NAME fact that needs the fix.
pub fn update_person(person: &PersonRecord) -> Vec<NameFactUpdate> {
    person
        .name_facts()
        .into_iter()
        .filter(fact_needs_update)
        .map(|fact| NameFactUpdate {
            index: fact.index,
            new_gedcom: rewrite_name_fact(&fact),
            old_gedcom: fact.gedcom,
        })
        .collect()
}

/// Returns all NAME facts joined by newlines, before and after the fix.
pub fn preview_update(person: &PersonRecord) -> NamePreview {
    let mut old = Vec::new();
    let mut new = Vec::new();

    for fact in person.name_facts() {
        let updated = if fact_needs_update(&fact) {
            rewrite_name_fact(&fact)
        } else {
            fact.gedcom.clone()
        };
        old.push(fact.gedcom);
        new.push(updated);
    }

    NamePreview {
        old: old.join("\n"),
        new: new.join("\n"),
    }
}
