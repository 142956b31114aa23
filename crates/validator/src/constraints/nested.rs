//! Nested model constraints
//!
//! A nested field is validated against the nested model's own schema. Its
//! errors are kept as a subtree of the parent's errors rather than being
//! flattened, so `{"address": {}}` fails as
//! `address -> nested -> {city -> required}`.

use crate::engine::{ModelRef, RequestModel};
use crate::foundation::{Check, CheckContext, CheckError, FieldError, ValidationErrors, Value};

// ============================================================================
// NESTED
// ============================================================================

/// Validates an object against a nested model's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nested {
    pub model: ModelRef,
}

impl Nested {
    #[must_use]
    pub const fn new(model: ModelRef) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn of<T: RequestModel>() -> Self {
        Self::new(ModelRef::of::<T>())
    }
}

impl Check for Nested {
    fn check(&self, value: Value, ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        match value {
            Value::Model(_) => Ok(value),
            Value::Map(map) => ctx.validate_nested(&self.model, &map).map(Value::Model),
            other => Err(FieldError::invalid_type("object", other.kind()).into()),
        }
    }
}

#[must_use]
pub fn nested<T: RequestModel>() -> Nested {
    Nested::of::<T>()
}

// ============================================================================
// NESTED LIST
// ============================================================================

/// Validates every element of a list against a nested model's schema.
///
/// All elements are validated; failing elements are reported under their
/// index in a single `nested_list` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedList {
    pub model: ModelRef,
}

impl NestedList {
    #[must_use]
    pub const fn new(model: ModelRef) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn of<T: RequestModel>() -> Self {
        Self::new(ModelRef::of::<T>())
    }
}

impl Check for NestedList {
    fn check(&self, value: Value, ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        let items = match value {
            Value::List(items) => items,
            other => return Err(FieldError::invalid_type("list", other.kind()).into()),
        };

        let mut models = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::new();

        for (index, item) in items.into_iter().enumerate() {
            let outcome = match item {
                Value::Model(model) => Ok(model),
                Value::Map(map) => ctx.validate_nested(&self.model, &map),
                other => Err(FieldError::invalid_type("object", other.kind()).into()),
            };

            match outcome {
                Ok(model) => models.push(Value::Model(model)),
                Err(CheckError::Field(error)) => {
                    let key = index.to_string();
                    errors.insert(key.clone(), error.with_key(key));
                }
                Err(fatal) => return Err(fatal),
            }
        }

        if errors.is_empty() {
            Ok(Value::List(models))
        } else {
            Err(FieldError::nested_list(errors).into())
        }
    }
}

#[must_use]
pub fn nested_list<T: RequestModel>() -> NestedList {
    NestedList::of::<T>()
}
