//! Choice constraint

use serde_json::Value as JsonValue;

use crate::foundation::{Check, CheckContext, CheckError, FieldError, Value};

/// Accepts only values strictly equal to one of the declared options.
///
/// Equality does not coerce: the option `"1"` does not accept the integer
/// `1`. Declare options with the field's coerced type.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub options: Vec<Value>,
}

impl Choice {
    pub fn new<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    fn options_param(&self) -> JsonValue {
        JsonValue::Array(self.options.iter().filter_map(Value::to_json).collect())
    }
}

impl Check for Choice {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        if self.options.contains(&value) {
            return Ok(value);
        }
        Err(FieldError::new("choice", "Must be one of the valid options.")
            .with_param("options", self.options_param())
            .into())
    }
}

pub fn choice<I, V>(options: I) -> Choice
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Choice::new(options)
}
