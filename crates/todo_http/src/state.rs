//! Shared handler state.
//!
//! # Responsibility
//! - Own the injected storage handle for the lifetime of the router.
//! - Run blocking SQLite work off the async executor.
//!
//! # Invariants
//! - The connection is only touched while its mutex is held.
//! - The connection is checked once at construction; each request borrows a
//!   repository from it without re-running the checks.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use todo_core::{
    ReadyConnection, RepoResult, SqliteTodoRepository, TodoService, TodoServiceResult,
};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<ReadyConnection>>,
}

impl AppState {
    /// Wraps a bootstrapped connection (see `todo_core::db::open_db`).
    ///
    /// # Errors
    /// Fails when the connection has not been bootstrapped.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let conn = ReadyConnection::try_new(conn)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `operation` against a service bound to the shared connection.
    pub async fn with_service<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&TodoService<SqliteTodoRepository<'c>>) -> TodoServiceResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = db
                .lock()
                .map_err(|_| ApiError::Internal("storage mutex poisoned".to_string()))?;
            let service = TodoService::new(conn.repository());
            Ok(operation(&service)?)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => Err(ApiError::Internal(format!("storage task failed: {err}"))),
        }
    }
}
