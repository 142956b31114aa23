//! Model schemas
//!
//! A [`RequestModel`](crate::engine::RequestModel) describes its fields with
//! [`FieldDecl`]s; [`SchemaBuilder::build`] validates the declarations and
//! produces an immutable [`Schema`]. Built schemas are cached per model type
//! in a [`SchemaRegistry`].

mod builder;
mod error;
mod field;
mod registry;

pub use builder::{Schema, SchemaBuilder};
pub use error::SchemaError;
pub use field::{FieldDecl, FieldSpec, FieldType};
pub use registry::SchemaRegistry;

pub(crate) use field::Declared;
