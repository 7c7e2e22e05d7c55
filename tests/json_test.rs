//! Tests for JSON export of validation results.

use std::sync::Arc;

use serde_json::json;
use valdy::{Mode, Rule, SharedError, ToJson, ValidationError, Validator};

#[derive(Debug, thiserror::Error)]
#[error("port out of range")]
struct PortOutOfRange;

fn in_range(target: &u32) -> Rule<u32> {
    Rule::new(format!("port {} should be below 65536", target), |port: &u32| {
        *port < 65536
    })
}

fn not_privileged(target: &u32) -> Rule<u32> {
    Rule::new(format!("port {} should be 1024 or above", target), |port: &u32| {
        *port >= 1024
    })
}

#[test]
fn test_run_all_failure_exports_children() {
    let validator: Validator<u32> = Validator::new();
    let err = validator
        .validate(&70000, &[&in_range, &not_privileged])
        .unwrap_err();

    assert_eq!(
        err.to_json(),
        json!({
            "kind": "validation",
            "message": "validation has failed",
            "errors": [
                { "message": "port 70000 should be below 65536" }
            ]
        })
    );
}

#[test]
fn test_stop_on_first_failure_exports_single_node() {
    let validator: Validator<u32> = Validator::with_mode(Mode::STOP_ON_FIRST_FAILURE);
    let err = validator
        .validate(&80, &[&in_range, &not_privileged])
        .unwrap_err();

    assert_eq!(
        err.to_json(),
        json!({
            "kind": "validation",
            "message": "port 80 should be 1024 or above"
        })
    );
}

#[test]
fn test_bound_identity_is_exported_as_original() {
    let identity: SharedError = Arc::new(PortOutOfRange);
    let factory = move |target: &u32| {
        Rule::new(format!("port {} should be below 65536", target), |port: &u32| {
            *port < 65536
        })
        .with_error(identity.clone())
    };

    let validator: Validator<u32> = Validator::new();
    let value = validator.validate(&70000, &[&factory]).unwrap_err().to_json();

    assert_eq!(value["errors"][0]["original"], json!("port out of range"));
    assert_eq!(
        value["errors"][0]["message"],
        json!("port 70000 should be below 65536")
    );
}

#[test]
fn test_unknown_mode_exports_internal_kind() {
    let validator: Validator<u32> = Validator::with_mode(Mode::from(42));
    let value = validator.validate(&80, &[&in_range]).unwrap_err().to_json();

    assert_eq!(
        value,
        json!({
            "kind": "internal",
            "message": "internal error: no such mode 42 for validator"
        })
    );
}

#[test]
fn test_nested_validator_result_exports_as_tree() {
    let identity: SharedError = Arc::new(PortOutOfRange);
    let factory = move |target: &u32| {
        Rule::new(format!("port {} should be below 65536", target), |port: &u32| {
            *port < 65536
        })
        .with_error(identity.clone())
    };

    let validator: Validator<u32> = Validator::new();
    let inner = validator.validate(&70000, &[&factory]).unwrap_err();
    let outer = ValidationError::new("config is invalid", [Arc::new(inner) as SharedError]);

    assert_eq!(
        outer.to_json(),
        json!({
            "message": "config is invalid",
            "errors": [
                {
                    "kind": "validation",
                    "message": "validation has failed",
                    "errors": [
                        {
                            "message": "port 70000 should be below 65536",
                            "original": "port out of range"
                        }
                    ]
                }
            ]
        })
    );
}
