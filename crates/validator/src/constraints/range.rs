//! Numeric range constraints
//!
//! Bounds are inclusive and compare integers and floats by value, so
//! `max(150)` rejects both `151` and `150.5`.

use crate::foundation::{AsValidatable, Check, CheckContext, CheckError, FieldError, Number, Value};

fn below(min: Number) -> FieldError {
    FieldError::new("min", "Must have a minimum of {min}.").with_param("min", min)
}

fn above(max: Number) -> FieldError {
    FieldError::new("max", "Must have a maximum of {max}.").with_param("max", max)
}

crate::constraint! {
    /// Rejects numbers below `min`.
    #[derive(Copy, PartialEq)]
    pub Min { min: Number } for Number;
    rule(self, input) { *input >= self.min }
    error(self, input) { below(self.min) }
    new(min: impl Into<Number>) { Self { min: min.into() } }
    fn min(min: impl Into<Number>);
}

crate::constraint! {
    /// Rejects numbers above `max`.
    #[derive(Copy, PartialEq)]
    pub Max { max: Number } for Number;
    rule(self, input) { *input <= self.max }
    error(self, input) { above(self.max) }
    new(max: impl Into<Number>) { Self { max: max.into() } }
    fn max(max: impl Into<Number>);
}

/// Rejects numbers outside `min..=max`, reporting `min` or `max` depending
/// on which bound failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InRange {
    pub min: Number,
    pub max: Number,
}

impl InRange {
    #[must_use]
    pub fn new(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl Check for InRange {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        let input = AsValidatable::<Number>::as_validatable(&value)?;
        if input < self.min {
            return Err(below(self.min).into());
        }
        if input > self.max {
            return Err(above(self.max).into());
        }
        Ok(value)
    }
}

#[must_use]
pub fn in_range(min: impl Into<Number>, max: impl Into<Number>) -> InRange {
    InRange::new(min, max)
}
