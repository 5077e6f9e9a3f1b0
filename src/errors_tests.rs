// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Unit tests for `errors.rs`

use super::*;
use kube::core::Status;

fn api_error(code: u16) -> kube::Error {
    kube::Error::Api(Status::failure("test", "test").with_code(code).boxed())
}

#[test]
fn test_is_conflict_matches_409_only() {
    assert!(is_conflict(&api_error(409)));
    assert!(!is_conflict(&api_error(404)));
    assert!(!is_conflict(&api_error(500)));
}

#[test]
fn test_is_not_found_matches_404_only() {
    assert!(is_not_found(&api_error(404)));
    assert!(!is_not_found(&api_error(409)));
    assert!(!is_not_found(&api_error(403)));
}

#[test]
fn test_spec_invalid_message_names_the_resource() {
    let err = OperatorError::spec_invalid("my-agent", "systemPrompt must not be empty");
    let msg = err.to_string();
    assert!(msg.contains("my-agent"));
    assert!(msg.contains("systemPrompt"));
}

#[test]
fn test_api_error_conversion() {
    let err: OperatorError = api_error(500).into();
    assert!(matches!(err, OperatorError::Api(_)));
}
