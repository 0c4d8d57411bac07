//! Batch fixup services.
//!
//! # Responsibility
//! - Drive candidates → confirm → preview/apply over a record store.
//! - Keep CLI and embedders decoupled from storage details.

pub mod data_fix_service;
