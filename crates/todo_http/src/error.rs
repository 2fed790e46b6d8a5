//! HTTP error mapping.
//!
//! # Responsibility
//! - Translate service outcomes into status codes and plain-text bodies.
//!
//! # Invariants
//! - Storage faults never leak detail to clients; detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use todo_core::{RepoError, TodoServiceError, TodoValidationError};

pub const NOT_FOUND_MESSAGE: &str = "Todo not found";
pub const CONFLICT_MESSAGE: &str = "Todo Already Exists";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Handler failure, rendered as a plain-text response.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a client-facing message.
    BadRequest(TodoValidationError),
    NotFound,
    Conflict,
    /// 500; the string is logged, never returned.
    Internal(String),
}

impl ApiError {
    /// Malformed request envelope (unparseable JSON, bad query string).
    pub fn invalid_data() -> Self {
        Self::BadRequest(TodoValidationError::InvalidData)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            TodoServiceError::Validation(err) => Self::BadRequest(err),
            TodoServiceError::TodoNotFound(_) => Self::NotFound,
            TodoServiceError::Conflict(_) => Self::Conflict,
            TodoServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        TodoServiceError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(err) => err.to_string(),
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
            Self::Conflict => CONFLICT_MESSAGE.to_string(),
            Self::Internal(detail) => {
                error!(
                    "event=http_response module=http status=error error_code=storage_fault error={detail}"
                );
                INTERNAL_MESSAGE.to_string()
            }
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use todo_core::db::DbError;
    use todo_core::{RepoError, TodoServiceError, TodoValidationError};

    #[test]
    fn service_errors_map_to_expected_status() {
        let cases = [
            (
                TodoServiceError::Validation(TodoValidationError::InvalidStatus),
                StatusCode::BAD_REQUEST,
            ),
            (TodoServiceError::TodoNotFound(1), StatusCode::NOT_FOUND),
            (TodoServiceError::Conflict(1), StatusCode::CONFLICT),
            (
                TodoServiceError::Repo(RepoError::InvalidData("bad row".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn repo_errors_reuse_service_mapping() {
        let err = ApiError::from(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(ApiError::from(RepoError::NotFound(3)), ApiError::NotFound));
    }
}
