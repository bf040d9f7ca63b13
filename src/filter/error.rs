//! Error types produced while filtering parameters.

use serde::Serialize;
use thiserror::Error;

/// Caller misuse: a malformed argument, never aggregated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{argument} {reason}")]
pub struct ArgumentError {
    pub argument: String,
    pub reason: String,
}

impl ArgumentError {
    pub fn new(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// A single rejected field, identified by its (possibly nested) path.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{field} {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field rejected during one filter call, in schema order.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("invalid parameters: {}", joined(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// First error recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of a filter call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FilterError {
    /// The field errors, when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            FilterError::Validation(e) => Some(e),
            FilterError::Argument(_) => None,
        }
    }
}
