//! Domain-level reconstruction errors.

use thiserror::Error;

/// Raised when an entity cannot be rebuilt from an untrusted record.
///
/// Always fatal to the current reconstruction attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// A required field is absent or falsy
    #[error("Invalid JSON for {entity}: missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A date field is present but cannot be parsed
    #[error("Invalid date for {entity}.{field}")]
    InvalidDate {
        entity: &'static str,
        field: &'static str,
    },
}

impl EntityError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            EntityError::MissingField { field, .. } | EntityError::InvalidDate { field, .. } => {
                field
            }
        }
    }
}
