//! Reference lookups and file uploads through the engine.

mod common;

use std::sync::Arc;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use sieve_validator::prelude::*;

fn avatar(status: u16) -> serde_json::Value {
    json!({
        "name": "me.png",
        "type": "image/png",
        "size": 2048,
        "tmp_name": "/tmp/php-upload-1",
        "error": status
    })
}

fn validator() -> Validator {
    Validator::default().with_lookup(Arc::new(directory()))
}

#[test]
fn references_resolve_to_records() {
    let profile: ProfileUpdate = validator()
        .validate(&input(json!({
            "avatar": avatar(0),
            "owner": 7,
            "teams": ["core", "web", "core"]
        })))
        .unwrap();

    assert_eq!(profile.avatar.name, "me.png");
    assert_eq!(profile.avatar.size, 2048);
    assert_eq!(profile.owner, json!({"id": 7, "name": "Ada"}));
    assert_eq!(profile.teams, vec![json!({"id": "core"}), json!({"id": "web"})]);
}

#[test]
fn unknown_references_and_failed_uploads_are_collected() {
    let err = validator()
        .validate::<ProfileUpdate>(&input(json!({
            "avatar": avatar(1),
            "owner": 99,
            "teams": ["core", "ops"]
        })))
        .unwrap_err();

    let errors = err.errors().unwrap();
    assert_eq!(
        errors.codes(),
        vec![
            ("avatar", "upload"),
            ("owner", "reference"),
            ("teams", "reference_list"),
        ]
    );
    assert_eq!(
        errors.get("owner").unwrap().render(),
        "Could not find an instance with id 99."
    );
}

#[test]
fn malformed_upload_is_a_transform_error() {
    let err = validator()
        .validate::<ProfileUpdate>(&input(json!({
            "avatar": "me.png",
            "owner": 7,
            "teams": []
        })))
        .unwrap_err();

    let avatar = err.errors().unwrap().get("avatar").unwrap();
    assert_eq!(avatar.code, "upload");
    assert_eq!(avatar.kind, ErrorKind::Transform);
}

#[test]
fn lookup_failure_is_wrapped_with_cause() {
    let failing = |_: &str, _: &ReferenceKey| -> Result<Option<serde_json::Value>, LookupError> {
        Err(LookupError::new("database offline"))
    };
    let validator = Validator::default().with_lookup(Arc::new(failing));

    let err = validator
        .validate::<ProfileUpdate>(&input(json!({
            "avatar": avatar(0),
            "owner": 7,
            "teams": ["core"]
        })))
        .unwrap_err();

    let errors = err.errors().unwrap();
    let owner = errors.get("owner").unwrap();
    assert_eq!(owner.code, "reference_unavailable");
    assert_eq!(owner.render(), "Could not verify owner.");
    assert_eq!(
        std::error::Error::source(owner).map(ToString::to_string),
        Some("database offline".to_owned())
    );
    assert_eq!(errors.get("teams").unwrap().code, "reference_unavailable");
}

#[test]
fn missing_lookup_is_a_schema_error() {
    let err = Validator::default()
        .validate::<ProfileUpdate>(&input(json!({
            "avatar": avatar(0),
            "owner": 7,
            "teams": []
        })))
        .unwrap_err();

    assert!(matches!(
        err,
        ValidateError::Schema(SchemaError::MissingLookup { ref field }) if field == "owner"
    ));
}

#[test]
fn lookup_failures_are_logged() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let failing = |_: &str, _: &ReferenceKey| -> Result<Option<serde_json::Value>, LookupError> {
        Err(LookupError::new("timeout"))
    };
    let validator = Validator::default().with_lookup(Arc::new(failing));

    let result = validator.validate::<ProfileUpdate>(&input(json!({
        "avatar": avatar(0),
        "owner": 7,
        "teams": ["core"]
    })));
    assert!(result.unwrap_err().is_invalid());
}
