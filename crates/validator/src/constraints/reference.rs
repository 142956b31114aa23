//! Reference-existence constraints
//!
//! A reference field holds the identifier of a record owned by some other
//! system (usually a datastore). The engine never performs I/O itself; it
//! asks a [`ReferenceLookup`] collaborator supplied to the
//! [`Validator`](crate::engine::Validator).

use std::borrow::Cow;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::foundation::{
    Check, CheckContext, CheckError, FieldError, Transform, TransformError, Value,
};

// ============================================================================
// REFERENCE KEY
// ============================================================================

/// Identifier of a referenced record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ReferenceKey {
    Int(i64),
    String(String),
}

impl ReferenceKey {
    /// Extracts a key from an integer or a non-blank string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::Int(*i)),
            Value::String(s) if !s.trim().is_empty() => Some(Self::String(s.trim().to_owned())),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ReferenceKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for ReferenceKey {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<&str> for ReferenceKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<ReferenceKey> for JsonValue {
    fn from(key: ReferenceKey) -> Self {
        match key {
            ReferenceKey::Int(i) => Self::from(i),
            ReferenceKey::String(s) => Self::String(s),
        }
    }
}

// ============================================================================
// LOOKUP COLLABORATOR
// ============================================================================

/// Failure of the lookup collaborator itself (connection lost, timeout).
///
/// Not the same as "not found": a missing record is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LookupError {
    pub message: Cow<'static, str>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl LookupError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Resolves references to records.
///
/// Calls are synchronous; timeouts and retries are the implementor's
/// concern.
pub trait ReferenceLookup: Send + Sync {
    /// Looks up one record of `collection`.
    fn find(&self, collection: &str, key: &ReferenceKey) -> Result<Option<JsonValue>, LookupError>;

    /// Looks up several records, returning those that exist.
    ///
    /// The default performs one `find` per key.
    fn find_many(
        &self,
        collection: &str,
        keys: &[ReferenceKey],
    ) -> Result<Vec<JsonValue>, LookupError> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.find(collection, key)? {
                found.push(record);
            }
        }
        Ok(found)
    }
}

impl<F> ReferenceLookup for F
where
    F: Fn(&str, &ReferenceKey) -> Result<Option<JsonValue>, LookupError> + Send + Sync,
{
    fn find(&self, collection: &str, key: &ReferenceKey) -> Result<Option<JsonValue>, LookupError> {
        self(collection, key)
    }
}

/// A lookup over records held in memory, keyed by collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookup {
    collections: HashMap<String, HashMap<ReferenceKey, JsonValue>>,
}

impl InMemoryLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_record(
        mut self,
        collection: impl Into<String>,
        key: impl Into<ReferenceKey>,
        record: JsonValue,
    ) -> Self {
        self.insert(collection, key, record);
        self
    }

    pub fn insert(
        &mut self,
        collection: impl Into<String>,
        key: impl Into<ReferenceKey>,
        record: JsonValue,
    ) {
        self.collections
            .entry(collection.into())
            .or_default()
            .insert(key.into(), record);
    }
}

impl ReferenceLookup for InMemoryLookup {
    fn find(&self, collection: &str, key: &ReferenceKey) -> Result<Option<JsonValue>, LookupError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }
}

fn unavailable(collection: &str, err: LookupError) -> FieldError {
    tracing::warn!(collection, error = %err, "reference lookup failed");
    FieldError::new("reference_unavailable", "Could not verify {name}.").with_cause(err)
}

// ============================================================================
// REFERENCE
// ============================================================================

/// Requires the identifier to resolve to an existing record.
///
/// The field's value becomes the record returned by the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub collection: Cow<'static, str>,
}

impl Reference {
    pub fn new(collection: impl Into<Cow<'static, str>>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

impl Transform for Reference {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        match ReferenceKey::from_value(&raw) {
            Some(_) => Ok(raw),
            None => Err(TransformError::new("reference", "Must be a valid identifier.")),
        }
    }
}

impl Check for Reference {
    fn check(&self, value: Value, ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        if let Value::Record(_) = value {
            return Ok(value);
        }
        let Some(key) = ReferenceKey::from_value(&value) else {
            return Err(FieldError::invalid_type("identifier", value.kind()).into());
        };

        match ctx.lookup()?.find(&self.collection, &key) {
            Ok(Some(record)) => Ok(Value::Record(record)),
            Ok(None) => Err(FieldError::new("reference", "Could not find an instance with id {id}.")
                .with_param("id", key)
                .into()),
            Err(err) => Err(unavailable(&self.collection, err).with_param("id", key).into()),
        }
    }
}

pub fn reference(collection: impl Into<Cow<'static, str>>) -> Reference {
    Reference::new(collection)
}

// ============================================================================
// REFERENCE LIST
// ============================================================================

/// Requires every identifier of a list to resolve to an existing record.
///
/// Duplicate identifiers are looked up once. The field's value becomes the
/// list of records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceList {
    pub collection: Cow<'static, str>,
}

impl ReferenceList {
    pub fn new(collection: impl Into<Cow<'static, str>>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    fn keys(items: &[Value]) -> Option<Vec<ReferenceKey>> {
        let mut keys: Vec<ReferenceKey> = Vec::with_capacity(items.len());
        for item in items {
            let key = ReferenceKey::from_value(item)?;
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Some(keys)
    }
}

impl Transform for ReferenceList {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        match &raw {
            Value::List(items) if Self::keys(items).is_some() => Ok(raw),
            _ => Err(TransformError::new(
                "reference_list",
                "Must be a list of valid identifiers.",
            )),
        }
    }
}

impl Check for ReferenceList {
    fn check(&self, value: Value, ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        let Value::List(items) = &value else {
            return Err(FieldError::invalid_type("list", value.kind()).into());
        };
        if items.iter().all(|item| matches!(item, Value::Record(_))) && !items.is_empty() {
            return Ok(value);
        }
        let Some(keys) = Self::keys(items) else {
            return Err(FieldError::invalid_type("list of identifiers", value.kind()).into());
        };

        let records = ctx
            .lookup()?
            .find_many(&self.collection, &keys)
            .map_err(|err| unavailable(&self.collection, err))?;

        if records.len() == keys.len() {
            Ok(Value::List(records.into_iter().map(Value::Record).collect()))
        } else {
            Err(FieldError::new("reference_list", "Could not find all instances.")
                .with_param("expected", keys.len())
                .with_param("found", records.len())
                .into())
        }
    }
}

pub fn reference_list(collection: impl Into<Cow<'static, str>>) -> ReferenceList {
    ReferenceList::new(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_error_with, check_with};
    use serde_json::json;
    use std::sync::Arc;

    fn users() -> Arc<dyn ReferenceLookup> {
        Arc::new(
            InMemoryLookup::new()
                .with_record("users", 1, json!({"id": 1, "name": "Ada"}))
                .with_record("users", "bob", json!({"id": "bob"})),
        )
    }

    #[test]
    fn test_reference_resolves_record() {
        let value = check_with(users(), &reference("users"), 1).unwrap();
        assert_eq!(value, Value::Record(json!({"id": 1, "name": "Ada"})));

        assert!(check_with(users(), &reference("users"), " bob ").is_ok());
    }

    #[test]
    fn test_reference_not_found() {
        let error = check_error_with(users(), &reference("users"), 42);
        assert_eq!(error.code, "reference");
        assert_eq!(error.render(), "Could not find an instance with id 42.");
    }

    #[test]
    fn test_lookup_failure_is_wrapped() {
        let failing: Arc<dyn ReferenceLookup> = Arc::new(|_: &str, _: &ReferenceKey| {
            Err::<Option<JsonValue>, _>(LookupError::new("connection refused"))
        });

        let error = check_error_with(failing, &reference("users"), 1);
        assert_eq!(error.code, "reference_unavailable");
        assert_eq!(
            error.cause().map(ToString::to_string).as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn test_reference_transform_rejects_non_keys() {
        assert!(reference("users").transform(Value::Float(1.5)).is_err());
        assert!(reference("users").transform(Value::from("  ")).is_err());
        assert!(reference("users").transform(Value::Int(3)).is_ok());
    }

    #[test]
    fn test_reference_list() {
        let all = Value::List(vec![Value::Int(1), Value::from("bob"), Value::Int(1)]);
        let value = check_with(users(), &reference_list("users"), all).unwrap();
        assert!(matches!(value, Value::List(ref records) if records.len() == 2));

        let partial = Value::List(vec![Value::Int(1), Value::Int(9)]);
        let error = check_error_with(users(), &reference_list("users"), partial);
        assert_eq!(error.code, "reference_list");
        assert_eq!(error.param("expected"), Some(&json!(2)));
        assert_eq!(error.param("found"), Some(&json!(1)));
    }
}
