use rusqlite::Connection;
use todo_core::db::open_db_in_memory;
use todo_core::db::schema::latest_version;
use todo_core::{
    Category, Priority, ReadyConnection, RepoError, SqliteTodoRepository, Status, Todo, TodoField, TodoListQuery,
    TodoPatch, TodoRepository,
};

fn todo(id: i64, text: &str, priority: Priority, status: Status, category: Category, due: &str) -> Todo {
    Todo {
        id,
        text: text.to_string(),
        priority,
        status,
        category,
        due_date: due.to_string(),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let item = todo(6, "Finalize event theme", Priority::Low, Status::ToDo, Category::Home, "2021-02-22");
    let id = repo.create_todo(&item).unwrap();
    assert_eq!(id, 6);

    let loaded = repo.get_todo(6).unwrap().unwrap();
    assert_eq!(loaded, item);
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    assert!(repo.get_todo(404).unwrap().is_none());
}

#[test]
fn duplicate_id_is_a_conflict_and_keeps_original() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let original = todo(1, "Learn Rust", Priority::High, Status::ToDo, Category::Learning, "2021-03-16");
    repo.create_todo(&original).unwrap();

    let replacement = todo(1, "Something else", Priority::Low, Status::Done, Category::Home, "2021-01-01");
    let err = repo.create_todo(&replacement).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(1)));

    assert_eq!(repo.get_todo(1).unwrap().unwrap(), original);
}

#[test]
fn create_rejects_invalid_todo_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let invalid = todo(3, "", Priority::Low, Status::Done, Category::Work, "2021-01-01");
    let err = repo.create_todo(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.get_todo(3).unwrap().is_none());
}

#[test]
fn update_field_writes_only_that_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let item = todo(6, "Finalize event theme", Priority::Low, Status::ToDo, Category::Home, "2021-02-22");
    repo.create_todo(&item).unwrap();

    let patch = TodoPatch::new(TodoField::Status, "DONE").unwrap();
    repo.update_todo_field(6, &patch).unwrap();

    let loaded = repo.get_todo(6).unwrap().unwrap();
    assert_eq!(loaded.status, Status::Done);
    assert_eq!(
        loaded,
        Todo {
            status: Status::Done,
            ..item
        }
    );
}

#[test]
fn update_due_date_targets_due_date_column() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    repo.create_todo(&todo(2, "Buy a Car", Priority::Medium, Status::InProgress, Category::Home, "2021-09-22"))
        .unwrap();

    let patch = TodoPatch::new(TodoField::DueDate, "2021-01-12").unwrap();
    repo.update_todo_field(2, &patch).unwrap();

    assert_eq!(repo.get_todo(2).unwrap().unwrap().due_date, "2021-01-12");
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let patch = TodoPatch::new(TodoField::Status, "DONE").unwrap();
    let err = repo.update_todo_field(999, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(999)));
}

#[test]
fn delete_succeeds_once_then_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    repo.create_todo(&todo(4, "Clean the garden", Priority::Low, Status::ToDo, Category::Home, "2021-04-04"))
        .unwrap();

    repo.delete_todo(4).unwrap();
    let err = repo.delete_todo(4).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(4)));
    assert!(repo.list_todos(&TodoListQuery::default()).unwrap().is_empty());
}

#[test]
fn read_rejects_rows_with_unknown_enum_values() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE todo (
            id INTEGER PRIMARY KEY,
            todo TEXT,
            priority TEXT,
            status TEXT,
            category TEXT,
            due_date TEXT
        );
        INSERT INTO todo VALUES (1, 'legacy', 'URGENT', 'DONE', 'WORK', '2021-01-01');
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.get_todo(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("todo.priority")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_todo_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("todo"))));
}

#[test]
fn repository_rejects_connection_missing_due_date_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE todo (
            id INTEGER PRIMARY KEY,
            todo TEXT,
            priority TEXT,
            status TEXT,
            category TEXT
        );
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todo",
            column: "due_date"
        })
    ));
}

#[test]
fn ready_connection_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = ReadyConnection::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

#[test]
fn repositories_from_ready_connection_share_one_store() {
    let ready = ReadyConnection::try_new(open_db_in_memory().unwrap()).unwrap();

    let learn = todo(1, "Learn Rust", Priority::High, Status::ToDo, Category::Learning, "2021-03-16");
    ready.repository().create_todo(&learn).unwrap();

    let patch = TodoPatch::new(TodoField::Status, "DONE").unwrap();
    ready.repository().update_todo_field(1, &patch).unwrap();

    let stored = ready.repository().get_todo(1).unwrap().unwrap();
    assert_eq!(stored.status, Status::Done);
    assert_eq!(stored.text, "Learn Rust");
}
