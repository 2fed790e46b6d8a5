//! Todo use-case service.
//!
//! # Responsibility
//! - Validate raw client input (filters, new todos, update bodies).
//! - Delegate persistence to a [`TodoRepository`] implementation.
//!
//! # Invariants
//! - Validation and malformed-update errors are raised before storage is touched.
//! - Not-found is derived from empty results or zero affected rows.
//! - Todo text is never written to logs.

use crate::model::patch::{TodoField, TodoPatch};
use crate::model::todo::{Category, Priority, Status, Todo, TodoId, TodoValidationError};
use crate::model::validate::is_valid_date;
use crate::repo::todo_repo::{RepoError, TodoListQuery, TodoRepository};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Client input rejected before any storage call.
    Validation(TodoValidationError),
    TodoNotFound(TodoId),
    /// Create with an id that is already taken.
    Conflict(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::Conflict(id) => write!(f, "todo already exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::Conflict(id) => Self::Conflict(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Raw listing filters as received from a query string.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoFilters {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub search_q: Option<String>,
}

impl TodoFilters {
    /// Validates every supplied filter and builds the typed query.
    ///
    /// Checks run in the order status, priority, category, date; the first
    /// failure wins.
    pub fn to_query(&self) -> Result<TodoListQuery, TodoValidationError> {
        let status = parse_present(&self.status, Status::parse, TodoValidationError::InvalidStatus)?;
        let priority = parse_present(
            &self.priority,
            Priority::parse,
            TodoValidationError::InvalidPriority,
        )?;
        let category = parse_present(
            &self.category,
            Category::parse,
            TodoValidationError::InvalidCategory,
        )?;
        let due_date = parse_present(
            &self.date,
            |value| is_valid_date(value).then(|| value.to_string()),
            TodoValidationError::InvalidDueDate,
        )?;

        Ok(TodoListQuery {
            status,
            priority,
            category,
            due_date,
            search_text: present(&self.search_q).map(str::to_string),
        })
    }
}

/// Create request with every field optional so missing ones can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTodoRequest {
    pub id: Option<TodoId>,
    pub todo: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

impl NewTodoRequest {
    /// Converts the request into a validated [`Todo`].
    ///
    /// # Errors
    /// - `InvalidData` when any field is missing or empty.
    /// - Field-specific errors in the order status, priority, category, due date.
    pub fn into_todo(self) -> Result<Todo, TodoValidationError> {
        let (Some(id), Some(text), Some(priority), Some(status), Some(category), Some(due_date)) = (
            self.id,
            self.todo.filter(|value| !value.is_empty()),
            self.priority.filter(|value| !value.is_empty()),
            self.status.filter(|value| !value.is_empty()),
            self.category.filter(|value| !value.is_empty()),
            self.due_date.filter(|value| !value.is_empty()),
        ) else {
            return Err(TodoValidationError::InvalidData);
        };

        let status = Status::parse(&status).ok_or(TodoValidationError::InvalidStatus)?;
        let priority = Priority::parse(&priority).ok_or(TodoValidationError::InvalidPriority)?;
        let category = Category::parse(&category).ok_or(TodoValidationError::InvalidCategory)?;
        if !is_valid_date(&due_date) {
            return Err(TodoValidationError::InvalidDueDate);
        }

        Ok(Todo {
            id,
            text,
            priority,
            status,
            category,
            due_date,
        })
    }
}

/// Use-case service wrapping a todo repository.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists todos matching every supplied filter.
    pub fn list_todos(&self, filters: &TodoFilters) -> TodoServiceResult<Vec<Todo>> {
        let query = filters.to_query().inspect_err(|err| {
            debug!("event=todo_list module=service status=rejected reason=\"{err}\"");
        })?;
        Ok(self.repo.list_todos(&query)?)
    }

    pub fn get_todo(&self, id: TodoId) -> TodoServiceResult<Todo> {
        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::TodoNotFound(id))
    }

    /// Lists todos due on `date`. The date is mandatory.
    pub fn agenda(&self, date: Option<&str>) -> TodoServiceResult<Vec<Todo>> {
        let Some(date) = date.filter(|value| is_valid_date(value)) else {
            return Err(TodoValidationError::InvalidDueDate.into());
        };
        Ok(self.repo.list_todos(&TodoListQuery::due_on(date))?)
    }

    /// Validates and inserts a new todo. Never overwrites an existing id.
    pub fn create_todo(&self, request: NewTodoRequest) -> TodoServiceResult<TodoId> {
        let todo = request.into_todo()?;
        let id = self.repo.create_todo(&todo)?;
        info!("event=todo_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Applies a single-field update body to the todo `id`.
    ///
    /// Returns the field that was written.
    pub fn update_todo(&self, id: TodoId, body: &Value) -> TodoServiceResult<TodoField> {
        let patch = TodoPatch::from_body(body).inspect_err(|err| {
            debug!("event=todo_update module=service status=rejected id={id} reason=\"{err}\"");
        })?;
        self.repo.update_todo_field(id, &patch)?;
        info!(
            "event=todo_update module=service status=ok id={id} field={}",
            patch.field().key()
        );
        Ok(patch.field())
    }

    pub fn delete_todo(&self, id: TodoId) -> TodoServiceResult<()> {
        self.repo.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn parse_present<T>(
    value: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
    error: TodoValidationError,
) -> Result<Option<T>, TodoValidationError> {
    match present(value) {
        Some(raw) => parse(raw).map(Some).ok_or(error),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTodoRequest, TodoFilters};
    use crate::model::todo::{Priority, Status, TodoValidationError};

    fn full_request() -> NewTodoRequest {
        NewTodoRequest {
            id: Some(6),
            todo: Some("Finalize event theme".to_string()),
            priority: Some("LOW".to_string()),
            status: Some("TO DO".to_string()),
            category: Some("HOME".to_string()),
            due_date: Some("2021-02-22".to_string()),
        }
    }

    #[test]
    fn filters_treat_empty_strings_as_absent() {
        let filters = TodoFilters {
            status: Some(String::new()),
            search_q: Some(String::new()),
            ..TodoFilters::default()
        };
        let query = filters.to_query().unwrap();
        assert_eq!(query.status, None);
        assert_eq!(query.search_text, None);
    }

    #[test]
    fn filters_report_first_invalid_field() {
        let filters = TodoFilters {
            status: Some("LATER".to_string()),
            priority: Some("URGENT".to_string()),
            ..TodoFilters::default()
        };
        assert_eq!(
            filters.to_query().unwrap_err(),
            TodoValidationError::InvalidStatus
        );

        let filters = TodoFilters {
            date: Some("2021-1-1".to_string()),
            ..TodoFilters::default()
        };
        assert_eq!(
            filters.to_query().unwrap_err(),
            TodoValidationError::InvalidDueDate
        );
    }

    #[test]
    fn filters_parse_valid_values() {
        let filters = TodoFilters {
            status: Some("IN PROGRESS".to_string()),
            priority: Some("HIGH".to_string()),
            date: Some("2021-04-04".to_string()),
            ..TodoFilters::default()
        };
        let query = filters.to_query().unwrap();
        assert_eq!(query.status, Some(Status::InProgress));
        assert_eq!(query.priority, Some(Priority::High));
        assert_eq!(query.due_date.as_deref(), Some("2021-04-04"));
    }

    #[test]
    fn new_todo_requires_every_field() {
        let mut request = full_request();
        request.id = None;
        assert_eq!(request.into_todo().unwrap_err(), TodoValidationError::InvalidData);

        let mut request = full_request();
        request.todo = Some(String::new());
        assert_eq!(request.into_todo().unwrap_err(), TodoValidationError::InvalidData);

        let mut request = full_request();
        request.due_date = None;
        assert_eq!(request.into_todo().unwrap_err(), TodoValidationError::InvalidData);
    }

    #[test]
    fn new_todo_checks_status_before_priority() {
        let mut request = full_request();
        request.status = Some("LATER".to_string());
        request.priority = Some("URGENT".to_string());
        assert_eq!(
            request.into_todo().unwrap_err(),
            TodoValidationError::InvalidStatus
        );
    }

    #[test]
    fn new_todo_converts_valid_request() {
        let todo = full_request().into_todo().unwrap();
        assert_eq!(todo.id, 6);
        assert_eq!(todo.status, Status::ToDo);
        assert_eq!(todo.due_date, "2021-02-22");
    }
}
