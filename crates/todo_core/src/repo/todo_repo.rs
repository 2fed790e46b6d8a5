//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listing over the `todo` table.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Client values are always bound parameters, never spliced into SQL.
//! - Read paths reject rows whose enum columns hold unknown values.
//! - Write paths call `Todo::validate()` before SQL mutations.

use crate::db::schema::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::patch::TodoPatch;
use crate::model::todo::{Category, Priority, Status, Todo, TodoId, TodoValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    todo,
    priority,
    status,
    category,
    due_date
FROM todo";

const REQUIRED_COLUMNS: [&str; 6] = ["id", "todo", "priority", "status", "category", "due_date"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    /// A todo with this id already exists.
    Conflict(TodoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Conflict(id) => write!(f, "todo already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Conjunctive listing filters. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    /// Exact `YYYY-MM-DD` match. Validated upstream.
    pub due_date: Option<String>,
    /// Substring of `todo`; empty text means no search.
    pub search_text: Option<String>,
}

impl TodoListQuery {
    /// Agenda listing: every todo due on `date`.
    pub fn due_on(date: impl Into<String>) -> Self {
        Self {
            due_date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Builds the parameterized `SELECT` and its bind values.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = self.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(priority) = self.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }

        if let Some(category) = self.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        if let Some(due_date) = self.due_date.as_ref() {
            sql.push_str(" AND due_date = ?");
            bind_values.push(Value::Text(due_date.clone()));
        }

        if let Some(search) = self.search_text.as_deref().filter(|text| !text.is_empty()) {
            sql.push_str(" AND todo LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like(search))));
        }

        sql.push_str(" ORDER BY id ASC");
        (sql, bind_values)
    }
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Writes one field of one todo. `NotFound` when no row has `id`.
    fn update_todo_field(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// Rejects connections that skipped the schema bootstrap or whose `todo`
    /// table lacks a required column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

/// Owned connection that has passed the readiness checks once.
///
/// Repositories borrowed from it skip the per-construction schema queries.
pub struct ReadyConnection {
    conn: Connection,
}

impl ReadyConnection {
    /// # Errors
    /// Same readiness failures as [`SqliteTodoRepository::try_new`].
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    pub fn repository(&self) -> SqliteTodoRepository<'_> {
        SqliteTodoRepository { conn: &self.conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        todo.validate()?;

        let result = self.conn.execute(
            "INSERT INTO todo (id, todo, priority, status, category, due_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                todo.id,
                todo.text.as_str(),
                todo.priority.as_str(),
                todo.status.as_str(),
                todo.category.as_str(),
                todo.due_date.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(todo.id),
            Err(err) if is_primary_key_violation(&err) => Err(RepoError::Conflict(todo.id)),
            Err(err) => Err(err.into()),
        }
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let (sql, bind_values) = query.to_sql();
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_todo_field(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()> {
        let sql = format!(
            "UPDATE todo SET {} = ?1 WHERE id = ?2;",
            patch.field().column()
        );
        let changed = self.conn.execute(&sql, params![patch.value(), id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todo WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in todo.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = Status::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in todo.status"))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid category `{category_text}` in todo.category"))
    })?;

    Ok(Todo {
        id: row.get("id")?,
        text: row.get("todo")?,
        priority,
        status,
        category,
        due_date: row.get("due_date")?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    if !table_exists(conn, "todo")? {
        return Err(RepoError::MissingRequiredTable("todo"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "todo", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todo",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{escape_like, TodoListQuery};
    use crate::model::todo::{Category, Status};
    use rusqlite::types::Value;

    #[test]
    fn empty_query_has_no_bind_values() {
        let (sql, binds) = TodoListQuery::default().to_sql();
        assert!(sql.ends_with("WHERE 1 = 1 ORDER BY id ASC"));
        assert!(binds.is_empty());
    }

    #[test]
    fn only_supplied_filters_are_bound_in_order() {
        let query = TodoListQuery {
            status: Some(Status::Done),
            category: Some(Category::Work),
            search_text: Some("Buy".to_string()),
            ..TodoListQuery::default()
        };
        let (sql, binds) = query.to_sql();
        assert!(sql.contains("AND status = ?"));
        assert!(sql.contains("AND category = ?"));
        assert!(!sql.contains("priority = ?"));
        assert!(!sql.contains("due_date = ?"));
        assert_eq!(
            binds,
            vec![
                Value::Text("DONE".to_string()),
                Value::Text("WORK".to_string()),
                Value::Text("%Buy%".to_string()),
            ]
        );
    }

    #[test]
    fn client_text_never_reaches_sql_text() {
        let query = TodoListQuery {
            search_text: Some("'; DROP TABLE todo; --".to_string()),
            due_date: Some("2021-01-01' OR '1'='1".to_string()),
            ..TodoListQuery::default()
        };
        let (sql, binds) = query.to_sql();
        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("OR '1'"));
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn empty_search_text_is_ignored() {
        let query = TodoListQuery {
            search_text: Some(String::new()),
            ..TodoListQuery::default()
        };
        let (_, binds) = query.to_sql();
        assert!(binds.is_empty());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
