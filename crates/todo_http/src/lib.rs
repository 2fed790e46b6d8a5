//! HTTP surface for the todo service.
//!
//! # Responsibility
//! - Map the `/todos/` and `/agenda/` endpoints onto `todo_core` use-cases.
//! - Render outcomes as plain-text or JSON responses with stable status codes.
//!
//! # Invariants
//! - Handlers never build SQL; all storage access goes through `TodoService`.
//! - The storage handle is injected through [`AppState`], never global.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
