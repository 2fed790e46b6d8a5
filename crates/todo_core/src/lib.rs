//! Core domain logic for the todo service.
//! This crate is the single source of truth for validation and query rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::patch::{TodoField, TodoPatch};
pub use model::todo::{Category, Priority, Status, Todo, TodoId, TodoValidationError};
pub use model::validate::{is_valid_category, is_valid_date, is_valid_priority, is_valid_status};
pub use repo::todo_repo::{
    ReadyConnection, RepoError, RepoResult, SqliteTodoRepository, TodoListQuery, TodoRepository,
};
pub use service::todo_service::{
    NewTodoRequest, TodoFilters, TodoService, TodoServiceError, TodoServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
