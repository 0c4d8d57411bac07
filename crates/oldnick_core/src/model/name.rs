//! Name record model.
//!
//! # Responsibility
//! - Carry the rendered display name together with its nickname sub-field.
//!
//! # Invariants
//! - An empty `nickname` means "no nickname" and is never an error.
//! - Rewrites produce a new `full_name`; `nickname` is never changed.

use serde::{Deserialize, Serialize};

/// One name entry of a person, as seen by the nickname rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Display string, conventionally `given "nick" /SURNAME/ suffix`.
    pub full_name: String,
    /// Value of the separate nickname sub-field. Empty when absent.
    pub nickname: String,
}

impl NameRecord {
    pub fn new(full_name: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            nickname: nickname.into(),
        }
    }

    /// Returns whether a non-empty nickname sub-field is present.
    pub fn has_nickname(&self) -> bool {
        !self.nickname.is_empty()
    }
}
