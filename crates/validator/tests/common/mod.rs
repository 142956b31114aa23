//! Shared model fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::{Map, Value as JsonValue};
use sieve_validator::prelude::*;

/// Unwraps a `json!` object literal into the input map `validate` expects.
pub fn input(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("fixture input must be an object, got {other}"),
    }
}

/// The error codes of a failed call, in field order.
pub fn codes(result: Result<impl std::fmt::Debug, ValidateError>) -> Vec<(String, String)> {
    let err = result.expect_err("expected validation to fail");
    let errors = err.into_errors().expect("expected field errors");
    errors
        .codes()
        .into_iter()
        .map(|(key, code)| (key.to_owned(), code.to_owned()))
        .collect()
}

// ============================================================================
// SIGNUP
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Signup {
    pub name: String,
    pub age: i64,
}

impl RequestModel for Signup {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(
                FieldDecl::string("name")
                    .constraint(min_length(1))
                    .constraint(max_length(50)),
            )
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

// ============================================================================
// STATUS FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StatusForm {
    pub status: String,
}

impl RequestModel for StatusForm {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema.field(FieldDecl::string("status").constraint(choice(["active", "inactive"])))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            status: fields.take("status")?,
        })
    }
}

// ============================================================================
// CUSTOMER / ADDRESS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

impl RequestModel for Address {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("city"))
            .field(
                FieldDecl::string("zip")
                    .alias("postal_code")
                    .optional()
                    .nullable()
                    .matches(r"^\d{4}\s?[A-Z]{2}$"),
            )
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            city: fields.take("city")?,
            zip: fields.take("zip")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub email: String,
    pub address: Address,
}

impl RequestModel for Customer {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("email").constraint(email()))
            .field(FieldDecl::model::<Address>("address"))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            email: fields.take("email")?,
            address: fields.take_model("address")?,
        })
    }
}

// ============================================================================
// ORDER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: i64,
}

impl RequestModel for OrderLine {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("sku").constraint(min_length(3)))
            .field(FieldDecl::int("quantity").constraint(min(1)))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            sku: fields.take("sku")?,
            quantity: fields.take("quantity")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub lines: Vec<OrderLine>,
    pub gift: bool,
    pub delivery: NaiveDate,
    pub billing: Option<Address>,
}

impl RequestModel for Order {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::model_list::<OrderLine>("lines"))
            .field(FieldDecl::bool("gift").optional().default(false))
            .field(FieldDecl::date("delivery"))
            .field(FieldDecl::model::<Address>("billing").optional().nullable())
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            lines: fields.take_models("lines")?,
            gift: fields.take("gift")?,
            delivery: fields.take("delivery")?,
            billing: fields.take_optional_model("billing")?,
        })
    }
}

// ============================================================================
// PROFILE UPDATE (uploads and references)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub avatar: UploadedFile,
    pub owner: JsonValue,
    pub teams: Vec<JsonValue>,
}

impl RequestModel for ProfileUpdate {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::upload("avatar"))
            .field(FieldDecl::reference("owner", "users"))
            .field(FieldDecl::reference_list("teams", "teams"))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            avatar: fields.take("avatar")?,
            owner: fields.take("owner")?,
            teams: fields.take("teams")?,
        })
    }
}

pub fn directory() -> InMemoryLookup {
    InMemoryLookup::new()
        .with_record("users", 7, serde_json::json!({"id": 7, "name": "Ada"}))
        .with_record("teams", "core", serde_json::json!({"id": "core"}))
        .with_record("teams", "web", serde_json::json!({"id": "web"}))
}

// ============================================================================
// RECURSIVE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub parent: Option<Box<Category>>,
}

impl RequestModel for Category {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("name"))
            .field(FieldDecl::model::<Category>("parent").optional().nullable())
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            name: fields.take("name")?,
            parent: fields.take_optional_model("parent")?.map(Box::new),
        })
    }
}
