//! Single-field partial update resolution.
//!
//! # Responsibility
//! - Map an update body onto exactly one updatable todo field.
//! - Validate the new value with the field's validator before any write.
//!
//! # Invariants
//! - A [`TodoPatch`] always holds exactly one field and an already-valid value.
//! - Column names come from [`TodoField`] only, never from client input.

use crate::model::todo::TodoValidationError;
use crate::model::validate::{is_valid_category, is_valid_date, is_valid_priority, is_valid_status};
use serde_json::Value;

/// Closed set of fields a client may update after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoField {
    Text,
    Priority,
    Status,
    Category,
    DueDate,
}

impl TodoField {
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Priority,
        Self::Status,
        Self::Category,
        Self::DueDate,
    ];

    /// Key used in request bodies.
    pub fn key(self) -> &'static str {
        match self {
            Self::Text => "todo",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Category => "category",
            Self::DueDate => "dueDate",
        }
    }

    /// Column written by the targeted update.
    pub fn column(self) -> &'static str {
        match self {
            Self::Text => "todo",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Category => "category",
            Self::DueDate => "due_date",
        }
    }

    /// Human-readable name used in `"<label> Updated"` responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Todo",
            Self::Priority => "Priority",
            Self::Status => "Status",
            Self::Category => "Category",
            Self::DueDate => "Due Date",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    fn validator(self) -> fn(&str) -> bool {
        match self {
            Self::Text => |value: &str| !value.is_empty(),
            Self::Priority => is_valid_priority,
            Self::Status => is_valid_status,
            Self::Category => is_valid_category,
            Self::DueDate => is_valid_date,
        }
    }

    fn invalid_value_error(self) -> TodoValidationError {
        match self {
            Self::Text => TodoValidationError::InvalidData,
            Self::Priority => TodoValidationError::InvalidPriority,
            Self::Status => TodoValidationError::InvalidStatus,
            Self::Category => TodoValidationError::InvalidCategory,
            Self::DueDate => TodoValidationError::InvalidDueDate,
        }
    }
}

/// A validated single-field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPatch {
    field: TodoField,
    value: String,
}

impl TodoPatch {
    /// Builds a patch after checking `value` against the field validator.
    ///
    /// # Errors
    /// Returns the field-specific validation error when `value` is illegal.
    pub fn new(field: TodoField, value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        if !(field.validator())(&value) {
            return Err(field.invalid_value_error());
        }
        Ok(Self { field, value })
    }

    /// Resolves a raw JSON update body into one patch.
    ///
    /// # Errors
    /// - `InvalidData` when the body is not an object, has zero or several
    ///   keys, or names an unknown key.
    /// - The field-specific error when the value is not a string or fails
    ///   its validator. For `todo` that error is `InvalidData`.
    pub fn from_body(body: &Value) -> Result<Self, TodoValidationError> {
        let Some(object) = body.as_object() else {
            return Err(TodoValidationError::InvalidData);
        };

        let mut entries = object.iter();
        let (Some((key, value)), None) = (entries.next(), entries.next()) else {
            return Err(TodoValidationError::InvalidData);
        };

        let field = TodoField::from_key(key).ok_or(TodoValidationError::InvalidData)?;
        let value = value.as_str().ok_or_else(|| field.invalid_value_error())?;
        Self::new(field, value)
    }

    pub fn field(&self) -> TodoField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
