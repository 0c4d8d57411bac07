//! Person and name model used by the nickname fixup.
//!
//! # Responsibility
//! - Define the minimal record shapes the fixup rule reads and rewrites.
//! - Parse raw GEDCOM person text into independent NAME facts.
//!
//! # Invariants
//! - Every person is identified by a stable GEDCOM xref (`PersonId`).
//! - The rule never creates or destroys name facts, it only replaces the
//!   value of an existing one.

pub mod gedcom;
pub mod name;
