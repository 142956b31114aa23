//! Field declarations and the built field specs

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

use crate::constraints::{self, Constraint};
use crate::engine::{ModelRef, RequestModel};
use crate::foundation::{Value, ValueKind};

// ============================================================================
// FIELD TYPE
// ============================================================================

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    Date,
    Time,
    DateTime,
    Upload,
    /// A record resolved by a reference lookup.
    Record,
    List,
    Map,
    /// Any value; the chain decides what is stored.
    Any,
    Model(ModelRef),
    ModelList(ModelRef),
}

impl FieldType {
    /// Whether a value of `kind` satisfies this type without coercion.
    #[must_use]
    pub fn accepts(self, kind: ValueKind) -> bool {
        match self {
            Self::Bool => kind == ValueKind::Bool,
            Self::Int => kind == ValueKind::Int,
            Self::Float => kind == ValueKind::Float,
            Self::String => kind == ValueKind::String,
            Self::Date => kind == ValueKind::Date,
            Self::Time => kind == ValueKind::Time,
            Self::DateTime => kind == ValueKind::DateTime,
            Self::Upload => kind == ValueKind::Upload,
            Self::Record => kind == ValueKind::Record,
            Self::List | Self::ModelList(_) => kind == ValueKind::List,
            Self::Map => kind == ValueKind::Map,
            Self::Model(_) => kind == ValueKind::Model,
            Self::Any => true,
        }
    }

    /// Built-in transformer for scalar types.
    pub(crate) fn scalar_transformer(self) -> Option<Constraint> {
        match self {
            Self::Bool => Some(constraints::boolean().into()),
            Self::Int => Some(constraints::integer().into()),
            Self::Float => Some(constraints::float().into()),
            Self::String => Some(constraints::text().into()),
            _ => None,
        }
    }

    pub(crate) fn nested_constraint(self) -> Option<Constraint> {
        match self {
            Self::Model(model) => Some(constraints::Nested::new(model).into()),
            Self::ModelList(model) => Some(constraints::NestedList::new(model).into()),
            _ => None,
        }
    }

    /// Parsing step for upload and temporal types.
    pub(crate) fn format_constraint(self) -> Option<Constraint> {
        match self {
            Self::Upload => Some(constraints::upload().into()),
            Self::Date => Some(constraints::date().into()),
            Self::Time => Some(constraints::time().into()),
            Self::DateTime => Some(constraints::datetime().into()),
            _ => None,
        }
    }

    /// Chain used when a field declares no constraint of its own.
    pub(crate) fn implicit_constraint(self) -> Option<Constraint> {
        self.format_constraint()
            .or_else(|| self.nested_constraint())
            .or_else(|| self.scalar_transformer())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::DateTime => f.write_str("datetime"),
            Self::Upload => f.write_str("upload"),
            Self::Record => f.write_str("record"),
            Self::List => f.write_str("list"),
            Self::Map => f.write_str("map"),
            Self::Any => f.write_str("any"),
            Self::Model(model) => write!(f, "{}", model.name()),
            Self::ModelList(model) => write!(f, "list<{}>", model.name()),
        }
    }
}

// ============================================================================
// FIELD DECLARATION
// ============================================================================

type OptionalPredicate = Box<dyn Fn(&str, &FieldDecl) -> bool + Send + Sync>;

enum Optionality {
    Required,
    Optional,
    When(OptionalPredicate),
}

enum DefaultSource {
    Value(Value),
    Provider(Box<dyn Fn() -> Value + Send + Sync>),
}

pub(crate) enum Declared {
    Constraint(Constraint),
    InvalidPattern { pattern: String, reason: String },
}

/// One entry of a model's field table.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// FieldDecl::string("name")
///     .constraint(min_length(1))
///     .constraint(max_length(50));
///
/// FieldDecl::int("age")
///     .optional()
///     .default(0)
///     .constraint(min(0))
///     .constraint(max(150));
///
/// FieldDecl::string("zip")
///     .alias("postal_code")
///     .matches(r"^\d{4}\s?[A-Z]{2}$");
/// ```
pub struct FieldDecl {
    pub(crate) name: Cow<'static, str>,
    pub(crate) alias: Option<Cow<'static, str>>,
    pub(crate) field_type: FieldType,
    pub(crate) nullable: bool,
    optionality: Optionality,
    default: Option<DefaultSource>,
    pub(crate) constraints: Vec<Declared>,
}

impl FieldDecl {
    pub fn new(name: impl Into<Cow<'static, str>>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            nullable: false,
            optionality: Optionality::Required,
            default: None,
            constraints: Vec::new(),
        }
    }

    pub fn bool(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn int(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn string(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn date(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn time(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Time)
    }

    pub fn datetime(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn upload(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Upload)
    }

    pub fn record(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Record)
    }

    pub fn list(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::List)
    }

    pub fn map(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Map)
    }

    pub fn any(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub fn model<T: RequestModel>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::Model(ModelRef::of::<T>()))
    }

    pub fn model_list<T: RequestModel>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, FieldType::ModelList(ModelRef::of::<T>()))
    }

    /// A record field resolved through the validator's reference lookup.
    pub fn reference(
        name: impl Into<Cow<'static, str>>,
        collection: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::record(name).constraint(constraints::reference(collection))
    }

    /// A list of records resolved through the validator's reference lookup.
    pub fn reference_list(
        name: impl Into<Cow<'static, str>>,
        collection: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::list(name).constraint(constraints::reference_list(collection))
    }

    /// Reads the value from `alias` instead of the field name.
    #[must_use = "builder methods must be chained or built"]
    pub fn alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn optional(mut self) -> Self {
        self.optionality = Optionality::Optional;
        self
    }

    /// Decides optionality from the field name and declaration. Evaluated
    /// once, when the schema is built.
    #[must_use = "builder methods must be chained or built"]
    pub fn optional_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &Self) -> bool + Send + Sync + 'static,
    {
        self.optionality = Optionality::When(Box::new(predicate));
        self
    }

    /// Value assigned when an optional field is absent. Constraints are not
    /// applied to it.
    #[must_use = "builder methods must be chained or built"]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSource::Value(value.into()));
        self
    }

    /// Like [`default`](Self::default), computed once when the schema is built.
    #[must_use = "builder methods must be chained or built"]
    pub fn default_with<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultSource::Provider(Box::new(provider)));
        self
    }

    /// Appends a constraint to the chain. Order is preserved.
    #[must_use = "builder methods must be chained or built"]
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(Declared::Constraint(constraint.into()));
        self
    }

    /// Appends a regex constraint. An invalid pattern fails the schema build.
    #[must_use = "builder methods must be chained or built"]
    pub fn matches(mut self, pattern: &str) -> Self {
        let declared = match constraints::matches(pattern) {
            Ok(matches) => Declared::Constraint(matches.into()),
            Err(err) => Declared::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: err.to_string(),
            },
        };
        self.constraints.push(declared);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The input key: the alias if set, otherwise the name.
    #[must_use]
    pub fn source_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn resolve_optional(&self) -> bool {
        match &self.optionality {
            Optionality::Required => false,
            Optionality::Optional => true,
            Optionality::When(predicate) => predicate(&self.name, self),
        }
    }

    pub(crate) fn resolve_default(&self) -> Option<Value> {
        self.default.as_ref().map(|source| match source {
            DefaultSource::Value(value) => value.clone(),
            DefaultSource::Provider(provider) => provider(),
        })
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("field_type", &self.field_type)
            .field("nullable", &self.nullable)
            .field("has_default", &self.has_default())
            .field("constraints", &self.constraints.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FIELD SPEC
// ============================================================================

/// A built, immutable field of a [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: Cow<'static, str>,
    pub(crate) source_key: Cow<'static, str>,
    pub(crate) field_type: FieldType,
    pub(crate) nullable: bool,
    pub(crate) optional: bool,
    pub(crate) default: Option<Value>,
    pub(crate) constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Property name on the model.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key read from the input map.
    #[must_use]
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Value used when an optional field is absent.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether a value of `kind` needs no coercion.
    #[must_use]
    pub fn accepts(&self, kind: ValueKind) -> bool {
        self.field_type.accepts(kind) || (self.nullable && kind == ValueKind::Null)
    }

    /// Human-readable description of the accepted types, e.g. `"int|null"`.
    #[must_use]
    pub fn type_description(&self) -> String {
        let mut parts: SmallVec<[String; 2]> = SmallVec::new();
        parts.push(self.field_type.to_string());
        if self.nullable {
            parts.push("null".to_owned());
        }
        parts.join("|")
    }
}
