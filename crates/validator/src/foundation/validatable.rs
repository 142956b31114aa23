//! AsValidatable trait with GAT for typed views of a [`Value`]
//!
//! A check declared over `str` or [`Number`] asks the value for that view.
//! Values of any other kind are rejected with an `invalid_type` error before
//! the rule runs.

use std::borrow::Borrow;

use crate::foundation::{FieldError, Number, Value};

// ============================================================================
// CORE TRAIT: AsValidatable with GAT
// ============================================================================

/// Conversion of a value into the input type of a check.
///
/// Uses a GAT so a view can either borrow from the value (`&str`) or be
/// computed (`Number`), unified through `Borrow`.
pub trait AsValidatable<T: ?Sized> {
    /// The output type, which must be borrowable as `&T`.
    type Output<'a>: Borrow<T>
    where
        Self: 'a;

    fn as_validatable(&self) -> Result<Self::Output<'_>, FieldError>;
}

// ============================================================================
// VALUE VIEWS
// ============================================================================

impl AsValidatable<str> for Value {
    type Output<'a>
        = &'a str
    where
        Self: 'a;

    #[inline]
    fn as_validatable(&self) -> Result<&str, FieldError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(FieldError::invalid_type("string", other.kind())),
        }
    }
}

impl AsValidatable<Number> for Value {
    type Output<'a>
        = Number
    where
        Self: 'a;

    #[inline]
    fn as_validatable(&self) -> Result<Number, FieldError> {
        self.as_number()
            .ok_or_else(|| FieldError::invalid_type("number", self.kind()))
    }
}
