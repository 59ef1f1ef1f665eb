//! Raw record persistence shared by every resource.
//!
//! A [`Record`] is the camelCase JSON-object form of a row, the same shape
//! entity `from_json` consumes. Stores move records in and out of the
//! database and never interpret business fields.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::json::parse_date;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Raw row as a JSON object map.
pub type Record = Map<String, Value>;

/// Table-level persistence for one resource.
///
/// Stores fill `id`, `createdAt`, `updatedAt` and `deleted` on insert and
/// bump `updatedAt` on every update. Soft-deleted rows are never returned by
/// the `*_active` queries.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new row built from the given fields
    async fn insert(&self, record: Record) -> AppResult<Record>;

    /// All rows not soft-deleted
    async fn find_all_active(&self) -> AppResult<Vec<Record>>;

    /// Row by id, unless soft-deleted
    async fn find_active(&self, id: &str) -> AppResult<Option<Record>>;

    /// Apply a change set to an existing row
    async fn update(&self, id: &str, changes: Record) -> AppResult<Record>;
}

/// Serialize a database model into its record form.
pub(crate) fn to_record<M: Serialize>(model: &M) -> AppResult<Record> {
    match serde_json::to_value(model) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(AppError::internal(format!(
            "model serialized to a non-object value: {}",
            other
        ))),
        Err(e) => Err(AppError::internal(format!("model serialization failed: {}", e))),
    }
}

/// String field that must be present in an insert record.
pub(crate) fn required_text(record: &Record, key: &str) -> AppResult<String> {
    match record.get(key) {
        Some(value) => text_value(value, key),
        None => Err(AppError::internal(format!("record is missing `{}`", key))),
    }
}

/// String field that may be absent or null.
pub(crate) fn optional_text(record: &Record, key: &str) -> AppResult<Option<String>> {
    record
        .get(key)
        .map_or(Ok(None), |value| nullable_text(value, key))
}

pub(crate) fn text_value(value: &Value, key: &str) -> AppResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::internal(format!("`{}` must be a string", key)))
}

pub(crate) fn nullable_text(value: &Value, key: &str) -> AppResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => text_value(other, key).map(Some),
    }
}

pub(crate) fn nullable_date(value: &Value, key: &str) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Ok(None),
        other => parse_date(other)
            .map(Some)
            .ok_or_else(|| AppError::internal(format!("`{}` must be a date", key))),
    }
}

pub(crate) fn flag(value: &Value, key: &str) -> AppResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| AppError::internal(format!("`{}` must be a boolean", key)))
}

pub(crate) fn unknown_column(table: &str, key: &str) -> AppError {
    AppError::internal(format!("{} has no updatable column `{}`", table, key))
}
