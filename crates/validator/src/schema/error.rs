//! Declaration errors

use crate::foundation::ValueKind;

/// A model declaration that cannot be validated against.
///
/// Raised when a schema is built (or, for [`SchemaError::MissingLookup`],
/// when a reference constraint runs on a validator without a lookup). These
/// are programming errors and are never reported as field errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("field `{model}.{field}` of type {field_type} must declare a constraint")]
    MissingConstraint {
        model: &'static str,
        field: String,
        field_type: String,
    },

    #[error("optional field `{model}.{field}` has no default and is not nullable")]
    UnsatisfiableDefault { model: &'static str, field: String },

    #[error("default of field `{model}.{field}` is {actual}, expected {expected}")]
    IncompatibleDefault {
        model: &'static str,
        field: String,
        expected: String,
        actual: ValueKind,
    },

    #[error("field `{model}.{field}` declares an invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        model: &'static str,
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("field `{field}` is declared more than once on `{model}`")]
    DuplicateField { model: &'static str, field: String },

    #[error("source key `{key}` is read by more than one field of `{model}`")]
    DuplicateSourceKey { model: &'static str, key: String },

    #[error("constraint `{constraint}` on field `{model}.{field}` cannot produce a {field_type}")]
    IncompatibleConstraint {
        model: &'static str,
        field: String,
        constraint: &'static str,
        field_type: String,
    },

    #[error("field `{field}` declares a reference constraint but no reference lookup is configured")]
    MissingLookup { field: String },
}

impl SchemaError {
    /// The offending field, when the error concerns one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingConstraint { field, .. }
            | Self::UnsatisfiableDefault { field, .. }
            | Self::IncompatibleDefault { field, .. }
            | Self::InvalidPattern { field, .. }
            | Self::DuplicateField { field, .. }
            | Self::IncompatibleConstraint { field, .. }
            | Self::MissingLookup { field } => Some(field),
            Self::DuplicateSourceKey { .. } => None,
        }
    }
}
