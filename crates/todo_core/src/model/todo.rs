//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its enumerated classification fields.
//! - Own the wire/storage spelling of every enum value.
//!
//! # Invariants
//! - `id` is caller-assigned, unique and immutable after creation.
//! - `text` is never empty.
//! - `due_date` always has the `YYYY-MM-DD` shape.

use crate::model::validate::is_valid_date;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-assigned todo identifier.
pub type TodoId = i64;

/// Relative urgency of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }
}

/// Progress state of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "TO DO",
            Self::InProgress => "IN PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }
}

/// Area of life a todo belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "WORK")]
    Work,
    #[serde(rename = "HOME")]
    Home,
    #[serde(rename = "LEARNING")]
    Learning,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Work, Self::Home, Self::Learning];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Home => "HOME",
            Self::Learning => "LEARNING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }
}

/// Canonical todo record.
///
/// Serialized with the external field names (`todo`, `dueDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    /// Task description. Stored in the `todo` column.
    #[serde(rename = "todo")]
    pub text: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    /// `YYYY-MM-DD`. Shape-checked only, see [`is_valid_date`].
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

impl Todo {
    /// Checks invariants that the enum types cannot express.
    ///
    /// # Errors
    /// - [`TodoValidationError::InvalidData`] for empty `text`.
    /// - [`TodoValidationError::InvalidDueDate`] for a malformed `due_date`.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.is_empty() {
            return Err(TodoValidationError::InvalidData);
        }
        if !is_valid_date(&self.due_date) {
            return Err(TodoValidationError::InvalidDueDate);
        }
        Ok(())
    }
}

/// Client-facing validation failure.
///
/// `Display` renders the exact message returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    InvalidStatus,
    InvalidPriority,
    InvalidCategory,
    InvalidDueDate,
    /// Missing fields, wrong shapes, or a malformed single-field update.
    InvalidData,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InvalidStatus => "Invalid Todo Status",
            Self::InvalidPriority => "Invalid Todo Priority",
            Self::InvalidCategory => "Invalid Todo Category",
            Self::InvalidDueDate => "Invalid Due Date",
            Self::InvalidData => "Invalid Data",
        };
        f.write_str(message)
    }
}

impl Error for TodoValidationError {}
