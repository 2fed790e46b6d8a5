//! Enumerated domain validators.
//!
//! Pure predicates over raw client strings. Every caller that turns client
//! input into a filter, a new row, or a single-field update goes through these.

use crate::model::todo::{Category, Priority, Status};
use once_cell::sync::Lazy;
use regex::Regex;

// Unanchored: any value containing the shape passes. ASCII digits only.
static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid due date regex"));

/// Returns whether `value` is one of `TO DO`, `IN PROGRESS`, `DONE`.
pub fn is_valid_status(value: &str) -> bool {
    Status::parse(value).is_some()
}

/// Returns whether `value` is one of `HIGH`, `MEDIUM`, `LOW`.
pub fn is_valid_priority(value: &str) -> bool {
    Priority::parse(value).is_some()
}

/// Returns whether `value` is one of `WORK`, `HOME`, `LEARNING`.
pub fn is_valid_category(value: &str) -> bool {
    Category::parse(value).is_some()
}

/// Returns whether `value` contains the `YYYY-MM-DD` shape.
///
/// Month and day ranges are not checked: `2021-13-40` is accepted. The match
/// is not anchored, so `2021-02-22T10:00` is accepted too.
pub fn is_valid_date(value: &str) -> bool {
    DUE_DATE_RE.is_match(value)
}
