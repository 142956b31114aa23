//! Basic usage example for sieve-validator

use serde_json::{Map, Value as JsonValue, json};
use sieve_validator::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Signup {
    name: String,
    age: i64,
}

impl RequestModel for Signup {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("name").constraint(min_length(2)))
            .field(
                FieldDecl::int("age")
                    .optional()
                    .default(0)
                    .constraint(min(0))
                    .constraint(max(150)),
            )
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            name: fields.take("name")?,
            age: fields.take("age")?,
        })
    }
}

fn object(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}

fn main() {
    // Valid input, with "age" coerced from a numeric string
    match validate::<Signup>(&object(json!({"name": "Ada", "age": "36"}))) {
        Ok(signup) => println!("✓ accepted {} ({})", signup.name, signup.age),
        Err(e) => println!("✗ Error: {e}"),
    }

    // Invalid input, every failing field reported at once
    match validate::<Signup>(&object(json!({"name": "A", "age": 200}))) {
        Ok(signup) => println!("✓ accepted {signup:?}"),
        Err(ValidateError::Invalid(errors)) => {
            println!("✗ rejected: {}", errors.to_json_value());
        }
        Err(e) => println!("✗ Error: {e}"),
    }
}
