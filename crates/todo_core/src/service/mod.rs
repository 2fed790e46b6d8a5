//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw client input into validated repository calls.
//! - Keep transport layers (HTTP) decoupled from storage details.

pub mod todo_service;
