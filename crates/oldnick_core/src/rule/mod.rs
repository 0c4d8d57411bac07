//! Nickname fixup rule.
//!
//! # Responsibility
//! - Decide whether a display name must quote its nickname inline.
//! - Produce the rewritten display name and person-level fact updates.
//! - Narrow large record sets with a cheap superset filter.
//!
//! # Invariants
//! - Every function here is pure and total; nothing performs I/O.
//! - The candidate filter never excludes a record the per-name rule flags,
//!   apart from the quoted-token approximation documented in `candidate`.

pub mod candidate;
pub mod nickname;
pub mod person;
pub mod preview;
