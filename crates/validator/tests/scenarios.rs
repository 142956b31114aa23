//! End-to-end validation of request input into models.

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use sieve_validator::prelude::*;

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(key, code)| ((*key).to_owned(), (*code).to_owned()))
        .collect()
}

// ============================================================================
// SIGNUP
// ============================================================================

#[test]
fn signup_coerces_numeric_strings() {
    let signup: Signup = validate(&input(json!({"name": "Al", "age": "30"}))).unwrap();
    assert_eq!(
        signup,
        Signup {
            name: "Al".to_owned(),
            age: 30
        }
    );
}

#[test]
fn signup_blank_name_is_required_and_age_defaults() {
    let err = validate::<Signup>(&input(json!({"name": ""}))).unwrap_err();
    let errors = err.errors().unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("name").unwrap().code, "required");
    assert!(!errors.contains_key("age"));
}

#[test]
fn signup_reports_every_failing_field() {
    let result = validate::<Signup>(&input(json!({"name": "A".repeat(60), "age": "200"})));
    let err = result.unwrap_err();
    let errors = err.errors().unwrap();

    let name = errors.get("name").unwrap();
    assert_eq!(name.code, "max_length");
    assert_eq!(name.param("max"), Some(&json!(50)));

    let age = errors.get("age").unwrap();
    assert_eq!(age.code, "max");
    assert_eq!(age.param("max"), Some(&json!(150)));
    assert_eq!(age.render(), "Must have a maximum of 150.");
}

#[rstest]
#[case(json!({"name": "Al", "age": "thirty"}), &[("age", "invalid_integer")])]
#[case(json!({"name": "Al", "age": -1}), &[("age", "min")])]
#[case(json!({"name": "Al", "age": 2.5}), &[("age", "invalid_integer")])]
#[case(json!({"name": {"first": "Al"}}), &[("name", "invalid_string")])]
#[case(json!({"name": [], "age": {}}), &[("name", "invalid_string"), ("age", "invalid_integer")])]
fn signup_rejections(#[case] data: serde_json::Value, #[case] expected: &[(&str, &str)]) {
    assert_eq!(codes(validate::<Signup>(&input(data))), pairs(expected));
}

#[test]
fn signup_null_age_takes_default() {
    let signup: Signup = validate(&input(json!({"name": "Bo", "age": null}))).unwrap();
    assert_eq!(signup.age, 0);
}

// ============================================================================
// CHOICE
// ============================================================================

#[test]
fn status_outside_choices() {
    let result = validate::<StatusForm>(&input(json!({"status": "deleted"})));
    assert_eq!(codes(result), pairs(&[("status", "choice")]));
}

#[test]
fn status_in_choices() {
    let form: StatusForm = validate(&input(json!({"status": "inactive"}))).unwrap();
    assert_eq!(form.status, "inactive");
}

// ============================================================================
// NESTED MODELS
// ============================================================================

#[test]
fn nested_errors_keep_their_tree() {
    let err = validate::<Customer>(&input(json!({"email": "a@b.co", "address": {}}))).unwrap_err();
    let errors = err.errors().unwrap();

    let address = errors.get("address").unwrap();
    assert_eq!(address.code, "nested");
    assert_eq!(address.kind, ErrorKind::Nested);

    let nested = address.nested().unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested.get("city").unwrap().code, "required");
}

#[test]
fn nested_model_is_instantiated() {
    let customer: Customer = validate(&input(json!({
        "email": "ada@example.com",
        "address": {"city": "Delft", "postal_code": "2611 AB"}
    })))
    .unwrap();

    assert_eq!(
        customer.address,
        Address {
            city: "Delft".to_owned(),
            zip: Some("2611 AB".to_owned()),
        }
    );
}

#[test]
fn nested_field_errors_are_keyed_by_alias() {
    let err = validate::<Customer>(&input(json!({
        "email": "not-an-email",
        "address": {"city": "Delft", "postal_code": "nope"}
    })))
    .unwrap_err();

    let paths = err.errors().unwrap().leaf_paths();
    assert_eq!(
        paths,
        vec![
            ("email".to_owned(), "email"),
            ("address.postal_code".to_owned(), "matches"),
        ]
    );
}

#[test]
fn nested_non_object_is_invalid_type() {
    let result = validate::<Customer>(&input(json!({"email": "a@b.co", "address": "Delft"})));
    assert_eq!(codes(result), pairs(&[("address", "invalid_type")]));
}

#[test]
fn nested_list_reports_failing_indexes() {
    let err = validate::<Order>(&input(json!({
        "lines": [
            {"sku": "ABC", "quantity": 2},
            {"sku": "X", "quantity": 0},
            {"sku": "DEF", "quantity": "3"}
        ],
        "delivery": "2024-06-01"
    })))
    .unwrap_err();

    let lines = err.errors().unwrap().get("lines").unwrap();
    assert_eq!(lines.code, "nested_list");

    let by_index = lines.nested().unwrap();
    assert_eq!(by_index.keys().collect::<Vec<_>>(), vec!["1"]);
    assert_eq!(
        by_index.get("1").unwrap().nested().unwrap().codes(),
        vec![("sku", "min_length"), ("quantity", "min")]
    );
}

#[test]
fn order_is_instantiated() {
    let order: Order = validate(&input(json!({
        "lines": [{"sku": "ABC", "quantity": "2"}],
        "gift": "yes",
        "delivery": "2024-06-01",
        "billing": null
    })))
    .unwrap();

    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].quantity, 2);
    assert!(order.gift);
    assert_eq!(order.delivery.to_string(), "2024-06-01");
    assert_eq!(order.billing, None);
}

#[test]
fn invalid_date_is_reported() {
    let result = validate::<Order>(&input(json!({"lines": [], "delivery": "01/06/2024"})));
    assert_eq!(codes(result), pairs(&[("delivery", "date")]));
}

#[derive(Debug, Clone, PartialEq)]
struct Appointment {
    day: NaiveDate,
    at: NaiveTime,
}

impl RequestModel for Appointment {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        let opening = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        schema
            .field(FieldDecl::date("day").constraint(choice([opening])))
            .field(FieldDecl::time("at").constraint(choice([
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            ])))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            day: fields.take("day")?,
            at: fields.take("at")?,
        })
    }
}

#[test]
fn temporal_fields_parse_before_explicit_checks() {
    let appointment: Appointment =
        validate(&input(json!({"day": "2024-06-01", "at": "14:30"}))).unwrap();
    assert_eq!(appointment.day.to_string(), "2024-06-01");
    assert_eq!(appointment.at.to_string(), "14:30:00");

    let result = validate::<Appointment>(&input(json!({"day": "2024-06-02", "at": "noon"})));
    assert_eq!(codes(result), pairs(&[("day", "choice"), ("at", "time")]));
}

#[test]
fn recursive_models() {
    let category: Category = validate(&input(json!({
        "name": "leaf",
        "parent": {"name": "branch", "parent": {"name": "root"}}
    })))
    .unwrap();

    let parent = category.parent.unwrap();
    assert_eq!(parent.name, "branch");
    assert_eq!(parent.parent.unwrap().name, "root");
}
