// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Error types for the Agentry operator.
//!
//! Errors fall into two classes:
//!
//! - **Expected-benign** conditions (`AlreadyExists` on create of an immutable
//!   kind, `NotFound` on delete) are never surfaced as errors at all; the
//!   applier in [`crate::reconcilers::apply`] absorbs them and reports them as
//!   outcomes.
//! - Everything else is fatal for the current reconciliation pass and is
//!   represented here, propagating to the controller runtime which requeues.

use thiserror::Error;

/// Errors that abort the current reconciliation pass.
#[derive(Error, Debug)]
pub enum OperatorError {
    /// The custom resource spec is invalid. Raised before any store call is
    /// made so a bad spec never partially applies.
    #[error("invalid spec for '{name}': {reason}")]
    SpecInvalid {
        /// Name of the offending custom resource
        name: String,
        /// What is wrong with the spec
        reason: String,
    },

    /// An unexpected Kubernetes API error (anything other than a benign
    /// conflict/not-found absorbed by the applier).
    #[error("kubernetes api error: {0}")]
    Api(#[from] kube::Error),

    /// Generated config content could not be serialized
    #[error("failed to serialize generated config: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OperatorError {
    /// Construct a `SpecInvalid` error.
    pub fn spec_invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpecInvalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Returns true if the error is an HTTP 409 Conflict from the API server.
#[must_use]
pub fn is_conflict(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 409)
}

/// Returns true if the error is an HTTP 404 Not Found from the API server.
#[must_use]
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
