//! Runtime values flowing through a constraint chain.
//!
//! Raw request data enters as [`serde_json::Value`] and is lifted into
//! [`Value`]. Transformers and checks then narrow it to the declared kind
//! (integers, dates, uploads, nested model instances) before it is handed
//! to [`RequestModel::instantiate`](crate::engine::RequestModel::instantiate).

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use crate::engine::AnyModel;
use crate::foundation::UploadedFile;

// ============================================================================
// VALUE
// ============================================================================

/// A value resolved for a single field.
///
/// Equality is strict: `Int(1)`, `Float(1.0)` and `String("1")` are all
/// different values. [`Choice`](crate::constraints::Choice) relies on this.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<FixedOffset>),
    Upload(UploadedFile),
    /// A record returned by a [`ReferenceLookup`](crate::constraints::ReferenceLookup).
    Record(JsonValue),
    List(Vec<Value>),
    /// Raw object input, typically awaiting nested validation.
    Map(JsonMap<String, JsonValue>),
    /// A validated nested model.
    Model(Box<dyn AnyModel>),
}

impl Value {
    /// Lifts raw decoded input into a `Value`.
    ///
    /// Integers that fit `i64` stay integers; every other number becomes a float.
    pub fn from_json(raw: &JsonValue) -> Self {
        match raw {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            JsonValue::String(s) => Self::String(s.clone()),
            JsonValue::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => Self::Map(map.clone()),
        }
    }

    /// Converts back to JSON. Nested model instances have no JSON form.
    pub fn to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => JsonNumber::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Self::Time(t) => JsonValue::String(t.format("%H:%M:%S").to_string()),
            Self::DateTime(dt) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Upload(file) => serde_json::to_value(file).ok()?,
            Self::Record(record) => record.clone(),
            Self::List(items) => {
                JsonValue::Array(items.iter().map(Self::to_json).collect::<Option<_>>()?)
            }
            Self::Map(map) => JsonValue::Object(map.clone()),
            Self::Model(_) => return None,
        })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Date(_) => ValueKind::Date,
            Self::Time(_) => ValueKind::Time,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Upload(_) => ValueKind::Upload,
            Self::Record(_) => ValueKind::Record,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Model(_) => ValueKind::Model,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of `Int` and `Float` values.
    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )+
    };
}

value_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    f32 => Float,
    String => String,
    &str => String,
    NaiveDate => Date,
    NaiveTime => Time,
    DateTime<FixedOffset> => DateTime,
    UploadedFile => Upload,
    Vec<Value> => List,
}

impl From<JsonValue> for Value {
    fn from(raw: JsonValue) -> Self {
        Self::from_json(&raw)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// VALUE KIND
// ============================================================================

/// The runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    Time,
    DateTime,
    Upload,
    Record,
    List,
    Map,
    Model,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Upload => "upload",
            Self::Record => "record",
            Self::List => "list",
            Self::Map => "map",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NUMBER
// ============================================================================

/// A numeric bound or input for range constraints.
///
/// Integers keep their exact representation so `max(150)` renders and
/// serializes as `150`, not `150.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Number> for JsonValue {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Self::from(i),
            Number::Float(f) => JsonNumber::from_f64(f).map_or(Self::Null, Self::Number),
        }
    }
}

// ============================================================================
// FROM VALUE
// ============================================================================

/// Extraction of a concrete Rust type from a resolved [`Value`].
///
/// Used by [`FieldValues::take`](crate::engine::FieldValues::take) when a
/// model is instantiated. On mismatch the actual kind is returned.
pub trait FromValue: Sized {
    /// Human-readable name of the expected kind, used in error reports.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Result<Self, ValueKind>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> Result<Self, ValueKind> {
        Ok(value)
    }
}

macro_rules! from_value {
    ($($ty:ty, $expected:literal => |$v:ident| $body:expr;)+) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = $expected;

                fn from_value(value: Value) -> Result<Self, ValueKind> {
                    let kind = value.kind();
                    let $v = value;
                    let converted: Option<Self> = $body;
                    converted.ok_or(kind)
                }
            }
        )+
    };
}

from_value! {
    bool, "bool" => |v| match v { Value::Bool(b) => Some(b), _ => None };
    i64, "int" => |v| match v { Value::Int(i) => Some(i), _ => None };
    i32, "int" => |v| match v { Value::Int(i) => i32::try_from(i).ok(), _ => None };
    u32, "int" => |v| match v { Value::Int(i) => u32::try_from(i).ok(), _ => None };
    u64, "int" => |v| match v { Value::Int(i) => u64::try_from(i).ok(), _ => None };
    usize, "int" => |v| match v { Value::Int(i) => usize::try_from(i).ok(), _ => None };
    f64, "float" => |v| v.as_number().map(Number::as_f64);
    Number, "number" => |v| v.as_number();
    String, "string" => |v| match v { Value::String(s) => Some(s), _ => None };
    NaiveDate, "date" => |v| match v { Value::Date(d) => Some(d), _ => None };
    NaiveTime, "time" => |v| match v { Value::Time(t) => Some(t), _ => None };
    DateTime<FixedOffset>, "datetime" => |v| match v { Value::DateTime(dt) => Some(dt), _ => None };
    UploadedFile, "upload" => |v| match v { Value::Upload(f) => Some(f), _ => None };
    JsonValue, "json" => |v| v.to_json();
    JsonMap<String, JsonValue>, "map" => |v| match v { Value::Map(m) => Some(m), _ => None };
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.kind()),
        }
    }
}
