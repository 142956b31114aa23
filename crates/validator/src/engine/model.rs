//! Request models and their instantiation
//!
//! A [`RequestModel`] declares its fields through [`RequestModel::describe`]
//! and builds itself from the validated values in
//! [`RequestModel::instantiate`]. Nested models travel through the engine
//! type-erased as [`AnyModel`] and are identified by a [`ModelRef`].

use std::any::{Any, TypeId, type_name};
use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use crate::foundation::{FromValue, Value, ValueKind};
use crate::schema::{Schema, SchemaBuilder};

// ============================================================================
// REQUEST MODEL
// ============================================================================

/// A typed request model.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Signup {
///     name: String,
///     age: i64,
/// }
///
/// impl RequestModel for Signup {
///     fn describe(schema: SchemaBuilder) -> SchemaBuilder {
///         schema
///             .field(FieldDecl::string("name").constraint(min_length(1)))
///             .field(FieldDecl::int("age").optional().default(0).constraint(min(0)))
///     }
///
///     fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
///         Ok(Self {
///             name: fields.take("name")?,
///             age: fields.take("age")?,
///         })
///     }
/// }
/// ```
pub trait RequestModel: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Declares the model's fields, in processing order.
    fn describe(schema: SchemaBuilder) -> SchemaBuilder;

    /// Builds the model from the values of a successful validation.
    ///
    /// Only called when every field passed. `fields` holds exactly one value
    /// per declared field, keyed by field name.
    fn instantiate(fields: FieldValues) -> Result<Self, InstantiateError>;
}

// ============================================================================
// ANY MODEL
// ============================================================================

/// Object-safe view of a [`RequestModel`] instance.
pub trait AnyModel: Any + fmt::Debug + Send + Sync {
    fn clone_model(&self) -> Box<dyn AnyModel>;

    fn eq_model(&self, other: &dyn AnyModel) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn model_name(&self) -> &'static str;
}

impl<T: RequestModel> AnyModel for T {
    fn clone_model(&self) -> Box<dyn AnyModel> {
        Box::new(self.clone())
    }

    fn eq_model(&self, other: &dyn AnyModel) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn model_name(&self) -> &'static str {
        short_type_name::<T>()
    }
}

impl Clone for Box<dyn AnyModel> {
    fn clone(&self) -> Self {
        (**self).clone_model()
    }
}

impl PartialEq for dyn AnyModel {
    fn eq(&self, other: &Self) -> bool {
        self.eq_model(other)
    }
}

impl dyn AnyModel {
    /// Recovers the concrete model, or `None` if it is another type.
    pub fn downcast<T: RequestModel>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|model| *model)
    }

    #[must_use]
    pub fn downcast_ref<T: RequestModel>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ============================================================================
// MODEL REF
// ============================================================================

/// Type-erased handle to a [`RequestModel`] type.
///
/// Carries what the engine needs to describe and build the model without
/// knowing its concrete type. Equality is type identity.
#[derive(Clone, Copy)]
pub struct ModelRef {
    id: TypeId,
    name: &'static str,
    describe: fn(SchemaBuilder) -> SchemaBuilder,
    instantiate: fn(FieldValues) -> Result<Box<dyn AnyModel>, InstantiateError>,
}

impl ModelRef {
    #[must_use]
    pub fn of<T: RequestModel>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            describe: T::describe,
            instantiate: |fields| {
                T::instantiate(fields).map(|model| Box::new(model) as Box<dyn AnyModel>)
            },
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn is<T: RequestModel>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    pub(crate) fn describe(&self, schema: SchemaBuilder) -> SchemaBuilder {
        (self.describe)(schema)
    }

    pub(crate) fn instantiate(
        &self,
        fields: FieldValues,
    ) -> Result<Box<dyn AnyModel>, InstantiateError> {
        (self.instantiate)(fields)
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelRef {}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef").field(&self.name).finish()
    }
}

// ============================================================================
// FIELD VALUES
// ============================================================================

/// The validated values of one model, keyed by field name, in declaration
/// order.
#[derive(Debug, Clone)]
pub struct FieldValues {
    model: &'static str,
    values: IndexMap<Cow<'static, str>, Value>,
}

impl FieldValues {
    pub(crate) fn with_capacity(model: &'static str, capacity: usize) -> Self {
        Self {
            model,
            values: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: Cow<'static, str>, value: Value) {
        self.values.insert(name, value);
    }

    /// Removes and converts the value of `name`.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, InstantiateError> {
        let value = self.take_raw(name)?;
        T::from_value(value).map_err(|actual| InstantiateError::TypeMismatch {
            model: self.model,
            field: name.to_owned(),
            expected: T::EXPECTED,
            actual,
        })
    }

    /// Removes the value of `name` without conversion.
    pub fn take_raw(&mut self, name: &str) -> Result<Value, InstantiateError> {
        self.values
            .shift_remove(name)
            .ok_or_else(|| InstantiateError::MissingValue {
                model: self.model,
                field: name.to_owned(),
            })
    }

    /// Removes a nested model instance.
    pub fn take_model<T: RequestModel>(&mut self, name: &str) -> Result<T, InstantiateError> {
        let value = self.take_raw(name)?;
        self.downcast_model(name, value)
    }

    /// Removes a nested model that may be null.
    pub fn take_optional_model<T: RequestModel>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, InstantiateError> {
        match self.take_raw(name)? {
            Value::Null => Ok(None),
            value => self.downcast_model(name, value).map(Some),
        }
    }

    /// Removes a list of nested model instances.
    pub fn take_models<T: RequestModel>(&mut self, name: &str) -> Result<Vec<T>, InstantiateError> {
        match self.take_raw(name)? {
            Value::List(items) => items
                .into_iter()
                .map(|item| self.downcast_model(name, item))
                .collect(),
            other => Err(InstantiateError::TypeMismatch {
                model: self.model,
                field: name.to_owned(),
                expected: "list",
                actual: other.kind(),
            }),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_ref(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn downcast_model<T: RequestModel>(
        &self,
        name: &str,
        value: Value,
    ) -> Result<T, InstantiateError> {
        match value {
            Value::Model(model) => model.downcast::<T>().ok_or_else(|| InstantiateError::Downcast {
                model: self.model,
                field: name.to_owned(),
                expected: short_type_name::<T>(),
            }),
            other => Err(InstantiateError::TypeMismatch {
                model: self.model,
                field: name.to_owned(),
                expected: "model",
                actual: other.kind(),
            }),
        }
    }
}

// ============================================================================
// INSTANTIATE ERROR
// ============================================================================

/// A model could not be built from values that passed validation.
///
/// Indicates a mismatch between a model's `describe` and its `instantiate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InstantiateError {
    #[error("no value for field `{model}.{field}`")]
    MissingValue { model: &'static str, field: String },

    #[error("field `{model}.{field}` holds {actual}, expected {expected}")]
    TypeMismatch {
        model: &'static str,
        field: String,
        expected: &'static str,
        actual: ValueKind,
    },

    #[error("field `{model}.{field}` does not hold a `{expected}`")]
    Downcast {
        model: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("could not build `{model}`: {message}")]
    Custom { model: &'static str, message: String },
}

impl InstantiateError {
    pub fn custom<T: RequestModel>(message: impl Into<String>) -> Self {
        Self::Custom {
            model: short_type_name::<T>(),
            message: message.into(),
        }
    }
}

// ============================================================================
// MODEL INSTANTIATOR
// ============================================================================

/// Builds a model instance from the values resolved for its schema.
pub struct ModelInstantiator;

impl ModelInstantiator {
    pub fn build(
        schema: &Schema,
        values: FieldValues,
    ) -> Result<Box<dyn AnyModel>, InstantiateError> {
        debug_assert_eq!(values.len(), schema.len());
        schema.model().instantiate(values)
    }
}
