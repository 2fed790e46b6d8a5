//! Todo domain model.
//!
//! # Responsibility
//! - Define the todo record, its enumerated fields and their validators.
//! - Resolve single-field update bodies into typed patches.
//!
//! # Invariants
//! - Every todo is identified by a caller-assigned `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod patch;
pub mod todo;
pub mod validate;
