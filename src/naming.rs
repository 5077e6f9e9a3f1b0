// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Deterministic owned-object names.
//!
//! Every object the controller creates for an instance is named by a pure
//! function of the instance name and the object kind. No index of created
//! objects is kept anywhere, so these functions are the *only* discovery
//! mechanism the delete reconciler has: creation and deletion must go through
//! the same function for every kind, or teardown will leak objects.

/// Dedicated namespace for an agent instance. The instance name is
/// cluster-unique, so the namespace is too.
#[must_use]
pub fn agent_namespace(name: &str) -> String {
    name.to_string()
}

/// `ServiceAccount` the agent pods run as.
#[must_use]
pub fn service_account(name: &str) -> String {
    format!("{name}-agent-sa")
}

/// Role granting the agent read access within its namespace.
#[must_use]
pub fn role(name: &str) -> String {
    format!("{name}-agent-role")
}

/// `RoleBinding` tying the role to the service account.
#[must_use]
pub fn role_binding(name: &str) -> String {
    format!("{name}-agent-rb")
}

/// Workspace data PVC.
#[must_use]
pub fn data_pvc(name: &str) -> String {
    format!("{name}-data")
}

/// Agent metadata PVC (session state, transcripts).
#[must_use]
pub fn metadata_pvc(name: &str) -> String {
    format!("{name}-metadata")
}

/// Secret holding the Anthropic API key for this instance.
#[must_use]
pub fn api_key_secret(name: &str) -> String {
    format!("{name}-api-key")
}

/// Secret holding user-supplied credential overrides.
#[must_use]
pub fn data_secrets(name: &str) -> String {
    format!("{name}-data-secrets")
}

/// `ConfigMap` carrying the generated MCP configuration.
#[must_use]
pub fn mcp_configmap(name: &str) -> String {
    format!("{name}-mcp-config")
}

/// `ConfigMap` carrying the generated nginx configuration.
#[must_use]
pub fn nginx_configmap(name: &str) -> String {
    format!("{name}-nginx-config")
}

/// Primary agent deployment (and its service).
#[must_use]
pub fn agent_deployment(name: &str) -> String {
    name.to_string()
}

/// Browser automation deployment (and its service).
#[must_use]
pub fn browser_deployment(name: &str) -> String {
    format!("{name}-browser")
}

/// nginx static server deployment (and its service).
#[must_use]
pub fn nginx_deployment(name: &str) -> String {
    format!("{name}-nginx")
}

/// Ingress routing to the code-server port of the agent service.
#[must_use]
pub fn code_ingress(name: &str) -> String {
    format!("{name}-code")
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod naming_tests;
