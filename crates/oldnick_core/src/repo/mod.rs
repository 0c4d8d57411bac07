//! Record store contracts and implementations.
//!
//! # Responsibility
//! - Define the host record-update operation the fixup consumes.
//! - Isolate SQLite query details from the batch fixup driver.
//!
//! # Invariants
//! - Every write keeps the denormalized `person_names` rows in step with the
//!   person's GEDCOM text.
//! - Store APIs return semantic errors (`PersonNotFound`,
//!   `NameFactNotFound`) in addition to DB transport errors.

pub mod memory_store;
pub mod person_repo;
