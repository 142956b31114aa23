//! String length constraints
//!
//! Length is measured in Unicode scalar values after trimming surrounding
//! whitespace, so `"  ab  "` has length 2.

use crate::foundation::{AsValidatable, Check, CheckContext, CheckError, FieldError, Value};

#[inline]
fn measure(input: &str) -> usize {
    input.trim().chars().count()
}

fn too_short(min: usize) -> FieldError {
    FieldError::new("min_length", "Must have a minimum length of {min}.").with_param("min", min)
}

fn too_long(max: usize) -> FieldError {
    FieldError::new("max_length", "Must have a maximum length of {max}.").with_param("max", max)
}

// ============================================================================
// MIN LENGTH
// ============================================================================

crate::constraint! {
    /// Rejects strings shorter than `min` after trimming.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize } for str;
    rule(self, input) { measure(input) >= self.min }
    error(self, input) { too_short(self.min) }
    fn min_length(min: usize);
}

// ============================================================================
// MAX LENGTH
// ============================================================================

crate::constraint! {
    /// Rejects strings longer than `max` after trimming.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize } for str;
    rule(self, input) { measure(input) <= self.max }
    error(self, input) { too_long(self.max) }
    fn max_length(max: usize);
}

// ============================================================================
// LENGTH RANGE
// ============================================================================

/// Rejects strings whose trimmed length is outside `min..=max`.
///
/// Reports `min_length` or `max_length` depending on which bound failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Check for LengthRange {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        let len = measure(AsValidatable::<str>::as_validatable(&value)?);
        if len < self.min {
            return Err(too_short(self.min).into());
        }
        if len > self.max {
            return Err(too_long(self.max).into());
        }
        Ok(value)
    }
}

#[must_use]
pub const fn length_range(min: usize, max: usize) -> LengthRange {
    LengthRange::new(min, max)
}
