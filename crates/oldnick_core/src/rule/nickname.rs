//! Per-name detection and rewrite.
//!
//! # Invariants
//! - An empty nickname short-circuits to "nothing to do".
//! - The nickname is used raw, both as match target and as insertion text.
//! - `rewrite` is a fixed point once the quoted nickname precedes a surname.

use crate::model::name::NameRecord;
use once_cell::sync::Lazy;
use regex::Regex;

/// Space, slash, any text, slash: the `given /SURNAME/` convention.
static SURNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" /.*/").expect("valid surname regex"));

const SURNAME_OPENER: &str = " /";

/// Returns whether `name` carries a nickname that its display string lacks.
///
/// True only when the nickname is non-empty, the display string has a
/// slash-delimited surname, and `"<nickname>" /` does not already occur.
pub fn needs_update(name: &NameRecord) -> bool {
    if !name.has_nickname() {
        return false;
    }
    SURNAME_RE.is_match(&name.full_name) && !has_quoted_nickname(name)
}

/// Returns the display string with the quoted nickname inserted before the
/// first ` /`.
///
/// Returns `full_name` unchanged when the nickname is empty, when it is
/// already quoted before a surname, or when there is no ` /` to anchor on.
pub fn rewrite(name: &NameRecord) -> String {
    if !name.has_nickname() || has_quoted_nickname(name) {
        return name.full_name.clone();
    }
    let replacement = format!(" \"{}\"{SURNAME_OPENER}", name.nickname);
    name.full_name.replacen(SURNAME_OPENER, &replacement, 1)
}

fn has_quoted_nickname(name: &NameRecord) -> bool {
    name.full_name
        .contains(&format!("\"{}\"{SURNAME_OPENER}", name.nickname))
}
