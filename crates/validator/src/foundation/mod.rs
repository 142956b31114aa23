//! Core validation types and traits
//!
//! This module contains the building blocks shared by the schema, the
//! constraints and the engine:
//!
//! - **Values**: [`Value`], [`ValueKind`], [`Number`], [`UploadedFile`], [`FromValue`]
//! - **Capabilities**: [`Transform`], [`Check`], [`CheckContext`]
//! - **Errors**: [`FieldError`], [`ValidationErrors`], [`TransformError`], [`ValidateError`]
//!
//! # Pipeline
//!
//! For every field the engine resolves the raw input, lets the first
//! constraint transform it when its kind is not accepted, then runs every
//! check in order:
//!
//! ```rust,ignore
//! let mut value = Value::from_json(raw);
//! if !field.accepts(value.kind()) {
//!     value = first.transform(value)?;
//! }
//! for constraint in field.constraints() {
//!     value = constraint.check(value, &ctx)?;
//! }
//! ```

mod error;
mod traits;
mod upload;
mod validatable;
mod value;

pub use error::{ErrorKind, FieldError, Params, TransformError, ValidateError, ValidationErrors};
pub use traits::{Check, CheckContext, CheckError, Transform};
pub use upload::UploadedFile;
pub use validatable::AsValidatable;
pub use value::{FromValue, Number, Value, ValueKind};
