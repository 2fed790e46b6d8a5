//! Repository layer for todo persistence.
//!
//! # Responsibility
//! - Define the data access contract used by the service layer.
//! - Isolate SQLite query construction from request orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod todo_repo;
