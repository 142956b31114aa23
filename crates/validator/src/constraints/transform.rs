//! Built-in transformers for scalar field types
//!
//! Every `bool`, `int`, `float` and `string` field gets the matching
//! transformer as the first element of its chain, so values arriving as
//! text (query strings, form fields) are coerced before any check runs.

use crate::foundation::{
    Check, CheckContext, CheckError, FieldError, Transform, TransformError, Value,
};

const TRUE_LITERALS: [&str; 4] = ["1", "true", "yes", "on"];
const FALSE_LITERALS: [&str; 4] = ["0", "false", "no", "off"];

/// Floats at or beyond this magnitude saturate when cast to `i64`.
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Check step of every transformer: the value must already be coerced.
fn expect_kind(
    value: Value,
    expected: &'static str,
    accepts: fn(&Value) -> bool,
) -> Result<Value, CheckError> {
    if accepts(&value) {
        Ok(value)
    } else {
        Err(FieldError::invalid_type(expected, value.kind()).into())
    }
}

// ============================================================================
// BOOLEAN
// ============================================================================

/// Coerces boolean literals.
///
/// Accepts `true`, `1`, `"1"`, `"true"`, `"yes"`, `"on"` and their false
/// counterparts `false`, `0`, `"0"`, `"false"`, `"no"`, `"off"`. Matching is
/// case-sensitive; `"TRUE"` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BooleanTransformer;

impl Transform for BooleanTransformer {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        let parsed = match &raw {
            Value::Bool(b) => Some(*b),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            Value::String(s) if TRUE_LITERALS.contains(&s.as_str()) => Some(true),
            Value::String(s) if FALSE_LITERALS.contains(&s.as_str()) => Some(false),
            _ => None,
        };

        parsed.map(Value::Bool).ok_or_else(|| {
            TransformError::new("invalid_boolean", "The value was not a boolean value.")
        })
    }
}

impl Check for BooleanTransformer {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        expect_kind(value, "bool", |v| matches!(v, Value::Bool(_)))
    }
}

#[must_use]
pub const fn boolean() -> BooleanTransformer {
    BooleanTransformer
}

// ============================================================================
// INTEGER
// ============================================================================

/// Coerces numeric input to an integer.
///
/// Numeric strings (`"30"`, `" 42 "`, `"1e3"`) and integral floats are
/// accepted. Fractional values and non-numeric text are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntegerTransformer;

impl IntegerTransformer {
    fn integral(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0 && f.abs() < I64_FLOAT_BOUND).then_some(f as i64)
    }
}

impl Transform for IntegerTransformer {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        let parsed = match &raw {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Self::integral(*f),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(Self::integral))
            }
            _ => None,
        };

        parsed
            .map(Value::Int)
            .ok_or_else(|| {
                TransformError::new("invalid_integer", "The value was not an integer value.")
            })
    }
}

impl Check for IntegerTransformer {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        expect_kind(value, "int", |v| matches!(v, Value::Int(_)))
    }
}

#[must_use]
pub const fn integer() -> IntegerTransformer {
    IntegerTransformer
}

// ============================================================================
// FLOAT
// ============================================================================

/// Coerces numeric input to a float. Non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FloatTransformer;

impl Transform for FloatTransformer {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        let parsed = match &raw {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| {
                TransformError::new("invalid_float", "The value was not a numeric value.")
            })
    }
}

impl Check for FloatTransformer {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        expect_kind(value, "float", |v| matches!(v, Value::Float(_)))
    }
}

#[must_use]
pub const fn float() -> FloatTransformer {
    FloatTransformer
}

// ============================================================================
// TEXT
// ============================================================================

/// Coerces scalar input to text. Numbers and booleans become their textual
/// form; lists and objects are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextTransformer;

impl Transform for TextTransformer {
    fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        match raw {
            Value::String(s) => Ok(Value::String(s)),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            Value::Float(f) => Ok(Value::String(f.to_string())),
            Value::Bool(b) => Ok(Value::String(if b { "1" } else { "0" }.to_owned())),
            _ => Err(TransformError::new("invalid_string", "The value was not a text value.")),
        }
    }
}

impl Check for TextTransformer {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        expect_kind(value, "string", |v| matches!(v, Value::String(_)))
    }
}

#[must_use]
pub const fn text() -> TextTransformer {
    TextTransformer
}
