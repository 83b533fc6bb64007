//! Common error types for Vellum.

use crate::datum::DatumType;
use thiserror::Error;

/// Result type for datum operations.
pub type DatumResult<T> = Result<T, DatumError>;

/// Coarse error classification, preserved when errors are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A value had the wrong structural type.
    Type,
    /// A referenced field or row does not exist.
    NonExistence,
    /// A request that cannot be satisfied as written.
    Logic,
}

/// Structural errors raised by datum operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatumError {
    /// A value had the wrong structural type.
    #[error("Expected type {expected} but found {actual}.")]
    TypeMismatch {
        expected: DatumType,
        actual: DatumType,
    },

    /// An object had no value at the named field.
    #[error("No attribute `{field}` in object.")]
    MissingField { field: String },

    /// Two statistics fields with the same key could not be combined.
    #[error("Cannot merge statistics `{key}` of type {left} and type {right}.")]
    StatsMergeMismatch {
        key: String,
        left: DatumType,
        right: DatumType,
    },
}

impl DatumError {
    pub fn type_mismatch(expected: DatumType, actual: DatumType) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn stats_merge_mismatch(key: impl Into<String>, left: DatumType, right: DatumType) -> Self {
        Self::StatsMergeMismatch {
            key: key.into(),
            left,
            right,
        }
    }

    /// The classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            DatumError::TypeMismatch { .. } => ErrorClass::Type,
            DatumError::MissingField { .. } => ErrorClass::NonExistence,
            DatumError::StatsMergeMismatch { .. } => ErrorClass::Logic,
        }
    }
}
