// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions for the Agentry operator.
//!
//! # Resource Types
//!
//! - [`Agent`] - A long-running LLM agent with a dedicated namespace, workspace
//!   storage, MCP configuration and optional code-server / browser side
//!   services.
//! - [`LLMRequest`] - A one-shot prompt run whose output is served statically
//!   by nginx.
//!
//! # Example: Declaring an Agent
//!
//! ```rust
//! use agentry::crd::{AgentSpec, McpConfig};
//!
//! let spec = AgentSpec {
//!     system_prompt: "You are a careful research assistant.".to_string(),
//!     mcp_config: McpConfig::default(),
//!     version: Some("1.2".to_string()),
//!     data_secrets: None,
//!     code_server: Some(true),
//!     browser_automation: None,
//!     ingress_host: Some("agent-1.agents.example.com".to_string()),
//! };
//! assert!(spec.validate("agent-1").is_ok());
//! ```

use crate::errors::OperatorError;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One MCP (Model Context Protocol) server entry.
///
/// Either a local command to spawn or a remote URL; both forms are carried
/// verbatim into the generated MCP config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    /// Command to spawn for a local MCP server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments passed to the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Environment variables for the spawned server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// URL of a remote MCP server. Mutually exclusive with `command` by
    /// convention; when both are set the command form wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Structured MCP configuration blob.
///
/// Rendered to `mcp.json` in the instance's MCP `ConfigMap`. The content is
/// regenerated from the current spec on every reconciliation of the config
/// map, never patched field by field.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct McpConfig {
    /// MCP servers keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, McpServer>,
}

/// Condition represents an observation of a resource's current state.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Condition {
    /// Type of condition. Common types include: Ready, Degraded, Failed.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Machine-readable reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// RFC3339 timestamp of the last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// A long-running LLM agent instance.
///
/// The instance name is cluster-unique and doubles as the name of the agent's
/// dedicated namespace. `systemPrompt`, `mcpConfig`, `version` and
/// `dataSecrets` are mutable; identity (the name) is not.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "agentry.dev",
    version = "v1alpha1",
    kind = "Agent",
    plural = "agents",
    namespaced,
    status = "AgentStatus",
    shortname = "ag"
)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    /// System prompt handed to the agent workload via `--system-prompt`.
    /// Required; reconciliation fails fast if empty.
    pub system_prompt: String,

    /// MCP server configuration rendered into the MCP `ConfigMap`.
    #[serde(default)]
    pub mcp_config: McpConfig,

    /// Image tag for the agent workload. Defaults to `latest`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Credential overrides projected into the instance's data-secrets
    /// Secret and exposed to the agent as environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_secrets: Option<BTreeMap<String, String>>,

    /// Run a code-server side-car next to the agent container. Defaults to
    /// true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_server: Option<bool>,

    /// Run a browser automation server as an auxiliary deployment. Defaults
    /// to false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_automation: Option<bool>,

    /// Hostname for the code-server ingress route. No ingress is created
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_host: Option<String>,
}

impl AgentSpec {
    /// Validate the spec before any API call is made.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::SpecInvalid`] if a required field is missing
    /// or empty.
    pub fn validate(&self, name: &str) -> Result<(), OperatorError> {
        if self.system_prompt.trim().is_empty() {
            return Err(OperatorError::spec_invalid(
                name,
                "systemPrompt must not be empty",
            ));
        }
        if let Some(host) = &self.ingress_host {
            if host.trim().is_empty() {
                return Err(OperatorError::spec_invalid(
                    name,
                    "ingressHost must not be empty when set",
                ));
            }
        }
        Ok(())
    }

    /// Effective image tag for the agent workload.
    #[must_use]
    pub fn effective_version(&self) -> &str {
        self.version
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_VERSION)
    }

    /// Whether the code-server side-car is enabled.
    #[must_use]
    pub fn code_server_enabled(&self) -> bool {
        self.code_server.unwrap_or(true)
    }

    /// Whether the browser automation deployment is enabled.
    #[must_use]
    pub fn browser_enabled(&self) -> bool {
        self.browser_automation.unwrap_or(false)
    }
}

/// Status subresource for [`Agent`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    /// Latest observed conditions.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Generation of the spec last acted upon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// A one-shot prompt run.
///
/// Reconciled in the resource's own namespace into an agent deployment plus
/// an nginx static server (config map, deployment, service) exposing the
/// run's output directory.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "agentry.dev",
    version = "v1alpha1",
    kind = "LLMRequest",
    plural = "llmrequests",
    namespaced,
    status = "LLMRequestStatus",
    shortname = "llmr"
)]
#[serde(rename_all = "camelCase")]
pub struct LLMRequestSpec {
    /// The user prompt handed to the runner via `--initial-user-input`.
    /// Required; reconciliation fails fast if empty.
    pub prompt: String,

    /// Image tag for the runner. Defaults to `latest`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl LLMRequestSpec {
    /// Validate the spec before any API call is made.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::SpecInvalid`] if the prompt is missing or
    /// empty.
    pub fn validate(&self, name: &str) -> Result<(), OperatorError> {
        if self.prompt.trim().is_empty() {
            return Err(OperatorError::spec_invalid(
                name,
                "prompt must not be empty",
            ));
        }
        Ok(())
    }

    /// Effective image tag for the runner.
    #[must_use]
    pub fn effective_version(&self) -> &str {
        self.version
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_VERSION)
    }
}

/// Status subresource for [`LLMRequest`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LLMRequestStatus {
    /// Latest observed conditions.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Generation of the spec last acted upon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
