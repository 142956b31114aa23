//! Prelude module for convenient imports.
//!
//! Provides a single `use sieve_validator::prelude::*;` import that brings
//! in everything needed to declare a model and validate input against it.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! FieldDecl::string("status").constraint(choice(["active", "inactive"]));
//! FieldDecl::int("age").optional().default(0).constraint(in_range(0, 150));
//! ```

// ============================================================================
// FOUNDATION: Values, capabilities, errors
// ============================================================================

pub use crate::foundation::{
    Check, CheckContext, CheckError, ErrorKind, FieldError, FromValue, Number, Transform,
    TransformError, UploadedFile, ValidateError, ValidationErrors, Value, ValueKind,
};

// ============================================================================
// CONSTRAINTS: All built-in constraints
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::constraints::*;

// ============================================================================
// SCHEMA AND ENGINE
// ============================================================================

pub use crate::engine::{
    BlankStrings, FieldValues, InstantiateError, RequestModel, Validator, ValidatorConfig,
};
pub use crate::schema::{FieldDecl, FieldType, Schema, SchemaBuilder, SchemaError, SchemaRegistry};
pub use crate::validate;
