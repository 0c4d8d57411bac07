//! Coarse candidate filter for bulk scans.
//!
//! # Responsibility
//! - Narrow a person population to those that might need the nickname fix.
//! - Mirror the SQL `LIKE` predicates used by the SQLite store, so both
//!   renditions select the same ids.
//!
//! # Invariants
//! - Output is a superset of persons with a name where `needs_update` holds,
//!   except for persons whose every name already quotes some other token
//!   before the surname (the quoted-token approximation).
//! - Patterns follow SQLite `LIKE` semantics: the tag match is ASCII
//!   case-insensitive and wildcards span newlines.

use crate::model::gedcom::{PersonId, PersonRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `%\n2 NICK _%`
static NICK_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\n2 [Nn][Ii][Cc][Kk] .").expect("valid nick marker regex"));
/// `% /%/%`
static SURNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s) /.*/").expect("valid surname regex"));
/// `% "%" /%`
static QUOTED_SURNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s) ".*" /"#).expect("valid quoted surname regex"));

/// Returns whether one person passes all three coarse conditions.
///
/// 1. Some NAME fact has a non-empty `NICK` sub-field.
/// 2. Some NAME value has a slash-delimited surname.
/// 3. Not every NAME value already quotes a token before its surname.
pub fn is_candidate(person: &PersonRecord) -> bool {
    let facts = person.name_facts();
    let has_nickname = facts
        .iter()
        .any(|fact| NICK_MARKER_RE.is_match(&fact.gedcom));
    let has_surname = facts.iter().any(|fact| SURNAME_RE.is_match(fact.value()));
    let all_quoted = facts
        .iter()
        .all(|fact| QUOTED_SURNAME_RE.is_match(fact.value()));

    has_nickname && has_surname && !all_quoted
}

/// Returns the ids of every candidate in `records`.
pub fn candidates<'a, I>(records: I) -> BTreeSet<PersonId>
where
    I: IntoIterator<Item = &'a PersonRecord>,
{
    records
        .into_iter()
        .filter(|person| is_candidate(person))
        .map(|person| person.id.clone())
        .collect()
}
