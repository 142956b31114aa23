//! Validation engine
//!
//! [`Validator`] runs a model's schema against a decoded input map. Every
//! field is processed in declaration order; all field failures are collected
//! before the call returns, and the model is only instantiated when none
//! failed.

mod config;
mod model;

pub use config::{BlankStrings, DEFAULT_MAX_DEPTH, ValidatorConfig};
pub use model::{
    AnyModel, FieldValues, InstantiateError, ModelInstantiator, ModelRef, RequestModel,
};

use std::fmt;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, trace};

use crate::constraints::ReferenceLookup;
use crate::foundation::{
    CheckContext, CheckError, FieldError, ValidateError, ValidationErrors, Value,
};
use crate::schema::{FieldSpec, Schema, SchemaRegistry};

/// Outcome of resolving one field.
enum Resolved {
    Value(Value),
    Failed(FieldError),
}

/// Validates input maps against request model schemas.
///
/// Cheap to clone; the registry and lookup are shared.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let validator = Validator::default().with_lookup(Arc::new(lookup));
/// let signup: Signup = validator.validate(&input)?;
/// ```
#[derive(Clone)]
pub struct Validator {
    registry: Arc<SchemaRegistry>,
    lookup: Option<Arc<dyn ReferenceLookup>>,
    config: ValidatorConfig,
}

impl Default for Validator {
    /// A validator over the global registry, without a reference lookup.
    fn default() -> Self {
        Self::new(SchemaRegistry::global())
    }
}

impl Validator {
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            lookup: None,
            config: ValidatorConfig::default(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_lookup(mut self, lookup: Arc<dyn ReferenceLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    #[must_use]
    pub fn lookup(&self) -> Option<&dyn ReferenceLookup> {
        self.lookup.as_deref()
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Validates `data` against the schema of `T` and builds a `T`.
    ///
    /// # Errors
    ///
    /// - [`ValidateError::Invalid`] with every field error when the input
    ///   does not satisfy the schema
    /// - [`ValidateError::Schema`] when the declaration of `T` (or a nested
    ///   model) is broken
    /// - [`ValidateError::Internal`] when `T::instantiate` rejects the values
    pub fn validate<T: RequestModel>(
        &self,
        data: &JsonMap<String, JsonValue>,
    ) -> Result<T, ValidateError> {
        let model = ModelRef::of::<T>();
        let instance = self.run_model(&model, data, 0)?;
        instance.downcast::<T>().ok_or_else(|| {
            InstantiateError::Downcast {
                model: model.name(),
                field: String::new(),
                expected: model.name(),
            }
            .into()
        })
    }

    /// Validates `data` against an already built schema.
    pub fn validate_schema(
        &self,
        schema: &Schema,
        data: &JsonMap<String, JsonValue>,
    ) -> Result<Box<dyn AnyModel>, ValidateError> {
        self.run(schema, data, 0)
    }

    pub(crate) fn run_model(
        &self,
        model: &ModelRef,
        data: &JsonMap<String, JsonValue>,
        depth: usize,
    ) -> Result<Box<dyn AnyModel>, ValidateError> {
        let schema = self.registry.resolve(model)?;
        self.run(&schema, data, depth)
    }

    fn run(
        &self,
        schema: &Schema,
        data: &JsonMap<String, JsonValue>,
        depth: usize,
    ) -> Result<Box<dyn AnyModel>, ValidateError> {
        let mut values = FieldValues::with_capacity(schema.model_name(), schema.len());
        let mut errors = ValidationErrors::new();

        for field in schema.fields() {
            match self.resolve_field(field, data, depth)? {
                Resolved::Value(value) => values.insert(field.name.clone(), value),
                Resolved::Failed(error) => {
                    trace!(
                        model = schema.model_name(),
                        field = field.name(),
                        code = %error.code,
                        "field rejected"
                    );
                    let error = error
                        .with_field(field.name.clone())
                        .with_key(field.source_key.clone());
                    errors.insert(field.source_key(), error);
                }
            }
        }

        if errors.has_errors() {
            debug!(
                model = schema.model_name(),
                errors = errors.len(),
                depth,
                "validation failed"
            );
            return Err(errors.into());
        }

        trace!(model = schema.model_name(), depth, "instantiating model");
        Ok(ModelInstantiator::build(schema, values)?)
    }

    fn resolve_field(
        &self,
        field: &FieldSpec,
        data: &JsonMap<String, JsonValue>,
        depth: usize,
    ) -> Result<Resolved, ValidateError> {
        let Some(raw) = self.present(data.get(field.source_key())) else {
            if let Some(default) = field.default_value().filter(|_| field.is_optional()) {
                return Ok(Resolved::Value(default.clone()));
            }
            return Ok(Resolved::Failed(FieldError::required()));
        };

        let ctx = CheckContext::new(self, field, depth);
        let mut value = Value::from_json(raw);

        let constraints = field.constraints();
        if let Some(first) = constraints.first() {
            if !field.accepts(value.kind()) && first.can_transform() {
                value = match first.transform(value) {
                    Ok(value) => value,
                    Err(err) => return Ok(Resolved::Failed(err.into())),
                };
            }
        }

        for constraint in constraints {
            value = match constraint.check(value, &ctx) {
                Ok(value) => value,
                Err(CheckError::Field(error)) => return Ok(Resolved::Failed(error)),
                Err(CheckError::Schema(err)) => return Err(err.into()),
                Err(CheckError::Internal(err)) => return Err(err.into()),
            };
        }

        if !field.accepts(value.kind()) {
            return Ok(Resolved::Failed(FieldError::invalid_type(
                field.type_description(),
                value.kind(),
            )));
        }

        Ok(Resolved::Value(value))
    }

    /// The raw input for a field, or `None` when it counts as absent.
    fn present<'a>(&self, raw: Option<&'a JsonValue>) -> Option<&'a JsonValue> {
        match raw? {
            JsonValue::Null => None,
            JsonValue::String(s) if s.trim().is_empty() => match self.config.blank_strings {
                BlankStrings::Absent => None,
                BlankStrings::Present => raw,
            },
            _ => raw,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("schemas", &self.registry.len())
            .field("lookup", &self.lookup.is_some())
            .field("config", &self.config)
            .finish()
    }
}
