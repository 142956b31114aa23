//! # sieve-validator
//!
//! Schema-driven validation of decoded request input into typed models.
//!
//! A model declares its fields once; every request is then checked field by
//! field, all failures are collected, and the model is only built when the
//! whole input is valid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Signup {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl RequestModel for Signup {
//!     fn describe(schema: SchemaBuilder) -> SchemaBuilder {
//!         schema
//!             .field(FieldDecl::string("name").constraint(min_length(1)).constraint(max_length(50)))
//!             .field(FieldDecl::int("age").optional().default(0).constraint(min(0)).constraint(max(150)))
//!     }
//!
//!     fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
//!         Ok(Self { name: fields.take("name")?, age: fields.take("age")? })
//!     }
//! }
//!
//! let signup: Signup = validate(json!({"name": "Alice", "age": "30"}).as_object().unwrap())?;
//! ```
//!
//! ## Errors
//!
//! A failed call returns [`ValidateError::Invalid`] holding every
//! [`FieldError`] keyed by input key. Its serialized form is the response
//! body clients receive:
//!
//! ```json
//! {
//!   "error": "validation_errors",
//!   "error_description": "Validation failed. Please fix the errors to continue.",
//!   "errors": {
//!     "age": { "error": "max", "error_description": "Must have a maximum of 150.", "params": { "max": 150 } }
//!   }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`foundation`]: values, capabilities and errors
//! - [`constraints`]: the built-in transformers and checks
//! - [`schema`]: field declarations, schemas and the schema registry
//! - [`engine`]: the [`Validator`] and the [`RequestModel`] contract

// FieldError carries params and an optional nested tree; boxing it would add
// an allocation to every failed check.
#![allow(clippy::result_large_err)]

#[macro_use]
mod macros;

pub mod constraints;
pub mod engine;
pub mod foundation;
pub mod prelude;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{
    AnyModel, BlankStrings, FieldValues, InstantiateError, ModelRef, RequestModel, Validator,
    ValidatorConfig,
};
pub use foundation::{FieldError, UploadedFile, ValidateError, ValidationErrors, Value};
pub use schema::{FieldDecl, FieldType, Schema, SchemaBuilder, SchemaError, SchemaRegistry};

use serde_json::{Map as JsonMap, Value as JsonValue};

/// Validates `data` into a `T` with the default [`Validator`].
///
/// Uses the global schema registry and no reference lookup; models with
/// reference fields need a [`Validator`] configured with
/// [`with_lookup`](Validator::with_lookup).
pub fn validate<T: RequestModel>(data: &JsonMap<String, JsonValue>) -> Result<T, ValidateError> {
    Validator::default().validate(data)
}
