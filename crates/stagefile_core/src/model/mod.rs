//! Domain model for stage-based note filing.
//!
//! # Responsibility
//! - Define the document handle and stage vocabulary shared by the
//!   watcher, services, and store boundary.
//!
//! # Invariants
//! - Every tracked note is identified by a stable `DocId`; paths are
//!   snapshots that can go stale after renames.
//! - Only the three closed `Stage` values are ever actionable.

pub mod document;
pub mod stage;
