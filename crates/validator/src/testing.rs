//! Helpers for running a single check outside a schema.

use std::borrow::Cow;
use std::sync::Arc;

use crate::constraints::ReferenceLookup;
use crate::engine::Validator;
use crate::foundation::{Check, CheckContext, CheckError, FieldError, Value};
use crate::schema::{FieldSpec, FieldType, SchemaRegistry};

fn field() -> FieldSpec {
    FieldSpec {
        name: Cow::Borrowed("field"),
        source_key: Cow::Borrowed("field"),
        field_type: FieldType::Any,
        nullable: false,
        optional: false,
        default: None,
        constraints: Vec::new(),
    }
}

fn run<C: Check>(
    validator: &Validator,
    constraint: &C,
    value: impl Into<Value>,
) -> Result<Value, CheckError> {
    let field = field();
    let ctx = CheckContext::new(validator, &field, 0);
    constraint.check(value.into(), &ctx)
}

fn validator(lookup: Option<Arc<dyn ReferenceLookup>>) -> Validator {
    let validator = Validator::new(Arc::new(SchemaRegistry::new()));
    match lookup {
        Some(lookup) => validator.with_lookup(lookup),
        None => validator,
    }
}

fn code(err: CheckError) -> String {
    match err {
        CheckError::Field(error) => error.code.into_owned(),
        other => other.to_string(),
    }
}

fn field_error(err: CheckError) -> FieldError {
    match err {
        CheckError::Field(error) => error,
        other => panic!("expected a field error, got {other}"),
    }
}

/// Runs `constraint` on `value`; a field failure comes back as its code.
pub(crate) fn check<C: Check>(constraint: &C, value: impl Into<Value>) -> Result<Value, String> {
    run(&validator(None), constraint, value).map_err(code)
}

/// Runs `constraint` on a value it must reject.
pub(crate) fn check_error<C: Check>(constraint: &C, value: impl Into<Value>) -> FieldError {
    match run(&validator(None), constraint, value) {
        Ok(value) => panic!("expected a rejection, got {value:?}"),
        Err(err) => field_error(err),
    }
}

pub(crate) fn check_with<C: Check>(
    lookup: Arc<dyn ReferenceLookup>,
    constraint: &C,
    value: impl Into<Value>,
) -> Result<Value, String> {
    run(&validator(Some(lookup)), constraint, value).map_err(code)
}

pub(crate) fn check_error_with<C: Check>(
    lookup: Arc<dyn ReferenceLookup>,
    constraint: &C,
    value: impl Into<Value>,
) -> FieldError {
    match run(&validator(Some(lookup)), constraint, value) {
        Ok(value) => panic!("expected a rejection, got {value:?}"),
        Err(err) => field_error(err),
    }
}
