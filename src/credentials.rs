// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Controller-held credentials provisioned into agent namespaces.
//!
//! The API key is read from the process environment exactly once at startup
//! and then passed explicitly into the secret-provisioning step of each
//! reconciliation. Reconcilers never touch the environment themselves, which
//! keeps them testable without environment mutation.

use anyhow::{Context, Result};

/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Credentials the controller provisions into each agent namespace.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Anthropic API key injected into agent workloads.
    pub anthropic_api_key: String,
}

impl Credentials {
    /// Build credentials with an explicit key (used by tests and embedders).
    #[must_use]
    pub fn new(anthropic_api_key: impl Into<String>) -> Self {
        Self {
            anthropic_api_key: anthropic_api_key.into(),
        }
    }

    /// Load credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `ANTHROPIC_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{API_KEY_ENV} must be set in the controller environment"))?;
        if key.trim().is_empty() {
            anyhow::bail!("{API_KEY_ENV} is set but empty");
        }
        Ok(Self {
            anthropic_api_key: key,
        })
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
