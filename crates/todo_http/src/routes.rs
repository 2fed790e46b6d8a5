//! Router assembly and request logging.

use crate::handlers;
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use std::time::Instant;

/// Builds the todo API router over the injected storage state.
///
/// Paths are served both with and without the trailing slash.
pub fn create_router(state: AppState) -> Router {
    let todos = get(handlers::list_todos).post(handlers::create_todo);
    let todo = get(handlers::get_todo)
        .put(handlers::update_todo)
        .delete(handlers::delete_todo);
    let agenda = get(handlers::agenda);

    Router::new()
        .route("/todos/", todos.clone())
        .route("/todos", todos)
        .route("/todos/{id}/", todo.clone())
        .route("/todos/{id}", todo)
        .route("/agenda/", agenda.clone())
        .route("/agenda", agenda)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    // Path only; query strings may carry search text.
    info!(
        "event=http_request module=http method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
