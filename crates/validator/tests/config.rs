//! Validator configuration: blank strings and nesting depth.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use sieve_validator::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Note {
    title: String,
    body: String,
}

impl RequestModel for Note {
    fn describe(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDecl::string("title"))
            .field(FieldDecl::string("body").optional().default("(empty)"))
    }

    fn instantiate(mut fields: FieldValues) -> Result<Self, InstantiateError> {
        Ok(Self {
            title: fields.take("title")?,
            body: fields.take("body")?,
        })
    }
}

fn with_config(json: &str) -> Validator {
    Validator::default().with_config(ValidatorConfig::from_json_str(json).unwrap())
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn blank_strings_are_absent_by_default(#[case] blank: &str) {
    let note: Note = validate(&input(json!({"title": "t", "body": blank}))).unwrap();
    assert_eq!(note.body, "(empty)");

    let err = validate::<Note>(&input(json!({"title": blank}))).unwrap_err();
    assert_eq!(err.errors().unwrap().get("title").unwrap().code, "required");
}

#[test]
fn blank_strings_can_be_kept() {
    let validator = with_config(r#"{"blank_strings": "present"}"#);

    let note: Note = validator
        .validate(&input(json!({"title": "", "body": "  "})))
        .unwrap();
    assert_eq!(
        note,
        Note {
            title: String::new(),
            body: "  ".to_owned()
        }
    );
}

#[test]
fn kept_blank_strings_still_run_the_chain() {
    let validator = Validator::default()
        .with_config(ValidatorConfig::new().with_blank_strings(BlankStrings::Present));

    let err = validator
        .validate::<Signup>(&input(json!({"name": "  "})))
        .unwrap_err();
    assert_eq!(err.errors().unwrap().get("name").unwrap().code, "min_length");
}

#[test]
fn nesting_beyond_max_depth_is_rejected() {
    let validator = with_config(r#"{"max_depth": 1}"#);
    let data = input(json!({
        "name": "leaf",
        "parent": {"name": "branch", "parent": {"name": "root"}}
    }));

    let err = validator.validate::<Category>(&data).unwrap_err();
    let paths = err.errors().unwrap().leaf_paths();
    assert_eq!(paths, vec![("parent.parent".to_owned(), "max_depth")]);

    let ok: Category = with_config(r#"{"max_depth": 2}"#).validate(&data).unwrap();
    assert_eq!(ok.parent.unwrap().parent.unwrap().name, "root");
}
