//! Decoded request bodies flowing into the rule engine.

use faultline_adapters::{
    BeanRules, ConstraintRule, PropertyRule, RuleValidationEngine, SerdeJsonCodec,
    ValidationMethodRule,
};
use faultline_domain::{
    EntityValue, FailureClass, JsonFailureKind, PathReference, ValidationGroup,
    HttpStatus, classify_json_failure, determine_status, format_violations,
};
use faultline_ports::{JsonCodecPort, ValidationEnginePort};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Signup {
    name: String,
    homepage: String,
    password: String,
    confirm: String,
    #[serde(default)]
    tags: Vec<u32>,
}

fn engine() -> RuleValidationEngine {
    RuleValidationEngine::new().with_bean(
        BeanRules::new("Signup")
            .with_property(PropertyRule::new("name", ConstraintRule::NotEmpty))
            .with_property(PropertyRule::new("homepage", ConstraintRule::Url))
            .with_validation_method(ValidationMethodRule::new(
                "passwordsMatch",
                "passwords must match",
                |signup| signup.property("password") == signup.property("confirm"),
            )),
    )
}

fn decode_entity(body: &str) -> Result<EntityValue, Box<dyn Error>> {
    let codec = SerdeJsonCodec::new();
    let signup: Signup = codec.decode(body.as_bytes())?;
    Ok(EntityValue::bean_from_json("Signup", codec.encode(&signup)?))
}

#[test]
fn decoded_bodies_are_validated_as_beans() -> Result<(), Box<dyn Error>> {
    let entity = decode_entity(
        r#"{"name": "", "homepage": "not a url", "password": "a", "confirm": "b"}"#,
    )?;

    let violations = engine().validate(&entity, &[ValidationGroup::DEFAULT]);

    assert_eq!(determine_status(&violations), HttpStatus::UNPROCESSABLE_ENTITY);
    assert_eq!(
        format_violations(&violations),
        vec![
            "homepage must be a valid URL".to_owned(),
            "name may not be empty".to_owned(),
            "passwords must match".to_owned(),
        ]
    );
    Ok(())
}

#[test]
fn valid_bodies_produce_no_violations() -> Result<(), Box<dyn Error>> {
    let entity = decode_entity(
        r#"{"name": "ada", "homepage": "https://example.com", "password": "a", "confirm": "a"}"#,
    )?;

    assert!(engine().validate(&entity, &[]).is_empty());
    Ok(())
}

#[test]
fn mistyped_elements_point_at_the_offending_field() -> Result<(), Box<dyn Error>> {
    let body = br#"{"name": "ada", "homepage": "https://example.com",
        "password": "a", "confirm": "a", "tags": [1, "two"]}"#;

    let failure = SerdeJsonCodec::new()
        .decode::<Signup>(body)
        .err()
        .ok_or("expected a decode failure")?;

    assert_eq!(failure.kind(), JsonFailureKind::MismatchedInput);
    assert_eq!(
        failure.path(),
        &[PathReference::Field("tags".to_owned()), PathReference::Index(1)]
    );
    assert_eq!(classify_json_failure(&failure), FailureClass::ClientInput);
    Ok(())
}

#[test]
fn missing_fields_are_client_errors() {
    let failure = SerdeJsonCodec::new()
        .decode::<Signup>(br#"{"name": "ada"}"#)
        .err();

    assert_eq!(
        failure.as_ref().map(|failure| failure.kind()),
        Some(JsonFailureKind::PropertyBinding)
    );
    assert_eq!(
        failure.as_ref().map(classify_json_failure),
        Some(FailureClass::ClientInput)
    );
}
