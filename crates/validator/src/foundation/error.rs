//! Error types for validation failures
//!
//! A failed `validate` call produces a single [`ValidationErrors`] holding one
//! [`FieldError`] per failing field, keyed by the field's source key. Fields
//! that hold nested models carry the nested model's own `ValidationErrors`,
//! so the error tree mirrors the input tree.
//!
//! All codes and message templates use `Cow<'static, str>` so the built-in
//! constraints never allocate for them.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;
use smallvec::SmallVec;

use crate::engine::InstantiateError;
use crate::schema::SchemaError;

/// Ordered template parameters of a [`FieldError`].
pub type Params = SmallVec<[(Cow<'static, str>, JsonValue); 2]>;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Which pipeline step produced a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    /// The field was absent and not optional.
    Required,
    /// The raw value could not be coerced to the declared type.
    Transform,
    /// A check in the constraint chain rejected the value.
    #[default]
    Constraint,
    /// A nested model (or an element of a nested list) failed.
    Nested,
}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// A validation failure for one field.
///
/// `message` is a template: `{param}` placeholders are replaced by the named
/// parameter and `{name}` by the field's source key. Use [`FieldError::render`]
/// to get the final text.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::foundation::FieldError;
///
/// let error = FieldError::new("max_length", "Must have a maximum length of {max}.")
///     .with_param("max", 50);
///
/// assert_eq!(error.render(), "Must have a maximum length of 50.");
/// ```
#[derive(Debug, Clone)]
pub struct FieldError {
    /// Machine-readable error code, e.g. `"required"` or `"max_length"`.
    pub code: Cow<'static, str>,

    /// Message template.
    pub message: Cow<'static, str>,

    /// Property name of the failing field.
    pub field: Option<Cow<'static, str>>,

    /// Input key the value was read from.
    pub key: Option<Cow<'static, str>>,

    /// Template parameters in insertion order.
    pub params: Params,

    /// Errors of a nested model, keyed by the nested source keys.
    pub nested: Option<Box<ValidationErrors>>,

    pub kind: ErrorKind,

    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl FieldError {
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            key: None,
            params: SmallVec::new(),
            nested: None,
            kind: ErrorKind::default(),
            cause: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Adds a template parameter, replacing an existing one with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<JsonValue>,
    ) -> Self {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested(mut self, errors: ValidationErrors) -> Self {
        self.nested = Some(Box::new(errors));
        self.kind = ErrorKind::Nested;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attaches the underlying failure, exposed through [`StdError::source`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn nested(&self) -> Option<&ValidationErrors> {
        self.nested.as_deref()
    }

    #[must_use]
    pub fn has_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Counts this error plus every nested error below it.
    #[must_use]
    pub fn total_error_count(&self) -> usize {
        1 + self
            .nested
            .as_ref()
            .map_or(0, |nested| nested.total_error_count())
    }

    /// Renders the message template.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.message.len());
        let mut rest: &str = &self.message;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let placeholder = &after[..end];
            match self.placeholder(placeholder) {
                Some(text) => out.push_str(&text),
                None => {
                    out.push('{');
                    out.push_str(placeholder);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn placeholder(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.param(name) {
            return Some(display_param(value));
        }
        (name == "name").then(|| {
            Cow::Borrowed(
                self.key
                    .as_deref()
                    .or(self.field.as_deref())
                    .unwrap_or("value"),
            )
        })
    }

    /// Converts to the canonical JSON form of a single field error.
    pub fn to_json_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

fn display_param(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::String(s) => Cow::Borrowed(s),
        JsonValue::Array(items) => Cow::Owned(
            items
                .iter()
                .map(display_param)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Cow::Owned(other.to_string()),
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = self.key.as_deref().or(self.field.as_deref()) {
            write!(f, "{key}: ")?;
        }
        write!(f, "{}", self.render())?;

        if let Some(nested) = &self.nested {
            write!(f, " ({} nested errors)", nested.total_error_count())?;
        }
        Ok(())
    }
}

impl StdError for FieldError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("error", &self.code)?;
        map.serialize_entry("error_description", &self.render())?;
        map.serialize_entry("params", &ParamsRef(&self.params))?;
        if let Some(nested) = &self.nested {
            map.serialize_entry("errors", &EntriesRef(nested))?;
        }
        map.end()
    }
}

struct ParamsRef<'a>(&'a [(Cow<'static, str>, JsonValue)]);

impl Serialize for ParamsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl FieldError {
    /// The field was absent and is not optional.
    pub fn required() -> Self {
        Self::new("required", "{name} is required.").with_kind(ErrorKind::Required)
    }

    /// The resolved value's kind is not one the field accepts.
    pub fn invalid_type(expected: impl Into<JsonValue>, actual: impl fmt::Display) -> Self {
        Self::new("invalid_type", "Expected {expected}, got {actual}.")
            .with_param("expected", expected)
            .with_param("actual", actual.to_string())
    }

    /// A nested model failed; `errors` are the nested model's own errors.
    pub fn nested_model(errors: ValidationErrors) -> Self {
        Self::new("nested", "{name} contains errors.").with_nested(errors)
    }

    /// One or more elements of a nested model list failed; `errors` are keyed
    /// by element index.
    pub fn nested_list(errors: ValidationErrors) -> Self {
        Self::new("nested_list", "{name} contains errors.").with_nested(errors)
    }

    pub fn max_depth(max: usize) -> Self {
        Self::new("max_depth", "{name} exceeds the maximum nesting depth of {max}.")
            .with_param("max", max)
    }
}

// ============================================================================
// TRANSFORM ERROR
// ============================================================================

/// A raw value could not be coerced to a field's declared type.
///
/// Always surfaces to callers as a [`FieldError`] of kind
/// [`ErrorKind::Transform`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct TransformError {
    pub code: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl TransformError {
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<TransformError> for FieldError {
    fn from(err: TransformError) -> Self {
        Self::new(err.code, err.message).with_kind(ErrorKind::Transform)
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// The complete set of field errors of one `validate` call.
///
/// Entries are keyed by source key and kept in schema declaration order.
/// For nested lists the keys are element indices.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: IndexMap<String, FieldError>,
}

impl ValidationErrors {
    /// Top-level error code in the serialized form.
    pub const CODE: &'static str = "validation_errors";

    /// Top-level description in the serialized form.
    pub const DESCRIPTION: &'static str = "Validation failed. Please fix the errors to continue.";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for `key`. A key keeps its first error.
    pub fn insert(&mut self, key: impl Into<String>, error: FieldError) {
        self.errors.entry(key.into()).or_insert(error);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.errors.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// `(key, code)` pairs of the top level, in order.
    #[must_use]
    pub fn codes(&self) -> Vec<(&str, &str)> {
        self.iter().map(|(k, e)| (k, e.code.as_ref())).collect()
    }

    /// `(dotted path, code)` pairs for every leaf error, depth first.
    ///
    /// `{"address": {"city": required}}` yields `("address.city", "required")`.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        for (key, error) in &self.errors {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match &error.nested {
                Some(nested) => nested.collect_leaves(&path, out),
                None => out.push((path, error.code.as_ref())),
            }
        }
    }

    #[must_use]
    pub fn total_error_count(&self) -> usize {
        self.errors.values().map(FieldError::total_error_count).sum()
    }

    /// Converts to the canonical serialized JSON form.
    pub fn to_json_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a String, &'a FieldError);
    type IntoIter = indexmap::map::Iter<'a, String, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldError)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, FieldError)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (key, error) in iter {
            errors.insert(key, error);
        }
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::DESCRIPTION)?;
        for (key, error) in &self.errors {
            write!(f, "\n  - {key}: {}", error.render())?;
        }
        Ok(())
    }
}

impl StdError for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("error", Self::CODE)?;
        map.serialize_entry("error_description", Self::DESCRIPTION)?;
        map.serialize_entry("errors", &EntriesRef(self))?;
        map.end()
    }
}

struct EntriesRef<'a>(&'a ValidationErrors);

impl Serialize for EntriesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.0.errors)
    }
}

// ============================================================================
// VALIDATE ERROR
// ============================================================================

/// Outcome of a failed `validate` call.
///
/// Only [`ValidateError::Invalid`] is caused by the input. The other variants
/// are programming errors in a model declaration or its `instantiate`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidateError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Internal(#[from] InstantiateError),
}

impl ValidateError {
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The field errors, if the input was invalid.
    #[must_use]
    pub const fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_errors(self) -> Option<ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_substitutes_params_and_name() {
        let error = FieldError::new("max", "{name} must have a maximum of {max}.")
            .with_param("max", 150)
            .with_key("age");

        assert_eq!(error.render(), "age must have a maximum of 150.");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let error = FieldError::new("x", "Value {unknown} and {open");
        assert_eq!(error.render(), "Value {unknown} and {open");
    }

    #[test]
    fn test_render_joins_list_params() {
        let error = FieldError::new("choice", "One of: {options}.")
            .with_param("options", json!(["active", "inactive"]));
        assert_eq!(error.render(), "One of: active, inactive.");
    }

    #[test]
    fn test_with_param_replaces_existing() {
        let error = FieldError::new("min", "m")
            .with_param("min", 1)
            .with_param("min", 2);
        assert_eq!(error.params.len(), 1);
        assert_eq!(error.param("min"), Some(&json!(2)));
    }

    #[test]
    fn test_insert_keeps_first_error_per_key() {
        let mut errors = ValidationErrors::new();
        errors.insert("name", FieldError::required());
        errors.insert("name", FieldError::new("other", "other"));

        assert_eq!(errors.codes(), vec![("name", "required")]);

        let collected: ValidationErrors = [
            ("age", FieldError::required()),
            ("name", FieldError::required()),
            ("age", FieldError::new("min", "too small")),
        ]
        .into_iter()
        .collect();
        assert_eq!(collected.codes(), vec![("age", "required"), ("name", "required")]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut address = ValidationErrors::new();
        address.insert("city", FieldError::required().with_key("city"));

        let mut errors = ValidationErrors::new();
        errors.insert(
            "name",
            FieldError::new("max_length", "Must have a maximum length of {max}.")
                .with_param("max", 50)
                .with_key("name"),
        );
        errors.insert(
            "address",
            FieldError::nested_model(address).with_key("address"),
        );

        assert_eq!(
            errors.to_json_value(),
            json!({
                "error": "validation_errors",
                "error_description": "Validation failed. Please fix the errors to continue.",
                "errors": {
                    "name": {
                        "error": "max_length",
                        "error_description": "Must have a maximum length of 50.",
                        "params": { "max": 50 }
                    },
                    "address": {
                        "error": "nested",
                        "error_description": "address contains errors.",
                        "params": {},
                        "errors": {
                            "city": {
                                "error": "required",
                                "error_description": "city is required.",
                                "params": {}
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_leaf_paths_and_counts() {
        let mut inner = ValidationErrors::new();
        inner.insert("city", FieldError::required());
        inner.insert("zip", FieldError::new("matches", "m"));

        let mut errors = ValidationErrors::new();
        errors.insert("address", FieldError::nested_model(inner));
        errors.insert("name", FieldError::required());

        assert_eq!(
            errors.leaf_paths(),
            vec![
                ("address.city".to_owned(), "required"),
                ("address.zip".to_owned(), "matches"),
                ("name".to_owned(), "required"),
            ]
        );
        assert_eq!(errors.total_error_count(), 4);
    }

    #[test]
    fn test_transform_error_becomes_field_error() {
        let error: FieldError =
            TransformError::new("invalid_integer", "Expected an integer.").into();
        assert_eq!(error.kind, ErrorKind::Transform);
        assert_eq!(error.code, "invalid_integer");
    }

    #[test]
    fn test_cause_is_exposed_as_source() {
        let io = std::io::Error::other("connection reset");
        let error = FieldError::new("reference_unavailable", "lookup failed").with_cause(io);

        assert!(error.source().is_some());
        assert_eq!(error.cause().map(ToString::to_string).as_deref(), Some("connection reset"));
    }
}
