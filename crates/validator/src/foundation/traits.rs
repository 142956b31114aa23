//! Core capabilities of a constraint
//!
//! A constraint can [`Transform`] a raw value into the declared type and
//! [`Check`] a value against its rule. Checks may hand a refined value to the
//! next check in the chain (a date check turns a string into a date, a
//! nested check turns an object into a model instance).

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::constraints::ReferenceLookup;
use crate::engine::{AnyModel, InstantiateError, ModelRef, Validator, ValidatorConfig};
use crate::foundation::{FieldError, TransformError, ValidateError, Value};
use crate::schema::{FieldSpec, SchemaError};

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Coercion of a raw value into a field's declared type.
///
/// Only invoked by the engine when the raw value's kind is not accepted by
/// the field and the transformer is the first element of the chain.
pub trait Transform {
    fn transform(&self, raw: Value) -> Result<Value, TransformError>;
}

/// A rule applied to a field value.
///
/// Returns the value for the next check, or the reason the field failed.
pub trait Check {
    fn check(&self, value: Value, ctx: &CheckContext<'_>) -> Result<Value, CheckError>;
}

// ============================================================================
// CHECK ERROR
// ============================================================================

/// Failure of a single check.
///
/// `Field` is an ordinary validation failure and is collected. The other
/// variants abort the whole `validate` call.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Internal(#[from] InstantiateError),
}

impl From<TransformError> for CheckError {
    fn from(err: TransformError) -> Self {
        Self::Field(err.into())
    }
}

// ============================================================================
// CHECK CONTEXT
// ============================================================================

/// What a check can see besides the value: the field being validated and
/// the engine running the call.
pub struct CheckContext<'a> {
    validator: &'a Validator,
    field: &'a FieldSpec,
    depth: usize,
}

impl<'a> CheckContext<'a> {
    pub(crate) const fn new(validator: &'a Validator, field: &'a FieldSpec, depth: usize) -> Self {
        Self {
            validator,
            field,
            depth,
        }
    }

    #[must_use]
    pub const fn field(&self) -> &FieldSpec {
        self.field
    }

    /// Nesting depth of the model owning this field; the top level is 0.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        self.validator.config()
    }

    /// The reference lookup collaborator.
    ///
    /// A field declaring a reference constraint on a validator without a
    /// lookup is a configuration error, not invalid input.
    pub fn lookup(&self) -> Result<&dyn ReferenceLookup, CheckError> {
        self.validator.lookup().ok_or_else(|| {
            SchemaError::MissingLookup {
                field: self.field.name().to_owned(),
            }
            .into()
        })
    }

    /// Validates `data` against a nested model's schema.
    ///
    /// Nested field errors come back as a single `nested` [`FieldError`]
    /// carrying the nested [`ValidationErrors`](crate::foundation::ValidationErrors).
    pub fn validate_nested(
        &self,
        model: &ModelRef,
        data: &JsonMap<String, JsonValue>,
    ) -> Result<Box<dyn AnyModel>, CheckError> {
        let max_depth = self.config().max_depth;
        if self.depth >= max_depth {
            return Err(FieldError::max_depth(max_depth).into());
        }

        match self.validator.run_model(model, data, self.depth + 1) {
            Ok(instance) => Ok(instance),
            Err(ValidateError::Invalid(errors)) => Err(FieldError::nested_model(errors).into()),
            Err(ValidateError::Schema(err)) => Err(err.into()),
            Err(ValidateError::Internal(err)) => Err(err.into()),
        }
    }
}
