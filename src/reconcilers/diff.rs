// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Spec diff classification and the update reconciler.
//!
//! Updates are driven by a typed change set, decided once here at the
//! boundary: [`classify_changes`] compares the previously applied spec with
//! the new one and yields [`SpecChange`] values. Each recognized change maps
//! to one idempotent action that patches only the field(s) it owns, so
//! concurrent or unrelated state is never clobbered:
//!
//! - `SystemPrompt` - rewrite the `--system-prompt` pair in the primary
//!   container's argument list
//! - `McpConfig` - regenerate the MCP config map and replace it in place
//! - `Version` - rewrite the primary container's image tag
//! - `DataSecrets` - regenerate the data-secrets secret
//!
//! If any action fired, the pod-template rollout annotation is bumped exactly
//! once so the workload controller replaces running pods. Unrecognized
//! changes are logged and otherwise ignored.

use crate::constants::{
    CONTAINER_NAME_AGENT, AGENT_IMAGE, ROLLOUT_ANNOTATION, SYSTEM_PROMPT_FLAG,
};
use crate::crd::AgentSpec;
use crate::errors::OperatorError;
use crate::naming;
use crate::reconcilers::apply::create_or_replace;
use crate::resources::{build_data_secrets, build_mcp_configmap};
use chrono::Utc;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;
use tracing::{debug, info, warn};

/// A recognized (or unrecognized) change between two agent specs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecChange {
    /// `systemPrompt` changed
    SystemPrompt,
    /// `mcpConfig` changed
    McpConfig,
    /// `version` changed
    Version,
    /// `dataSecrets` changed
    DataSecrets,
    /// A field the update reconciler takes no action on
    Unrecognized(&'static str),
}

/// Classify the field-level differences between two specs into update
/// actions. Returns an empty vector when the specs are identical.
#[must_use]
pub fn classify_changes(old: &AgentSpec, new: &AgentSpec) -> Vec<SpecChange> {
    let mut changes = Vec::new();

    if old.system_prompt != new.system_prompt {
        changes.push(SpecChange::SystemPrompt);
    }
    if old.mcp_config != new.mcp_config {
        changes.push(SpecChange::McpConfig);
    }
    if old.version != new.version {
        changes.push(SpecChange::Version);
    }
    if old.data_secrets != new.data_secrets {
        changes.push(SpecChange::DataSecrets);
    }
    if old.code_server != new.code_server {
        changes.push(SpecChange::Unrecognized("codeServer"));
    }
    if old.browser_automation != new.browser_automation {
        changes.push(SpecChange::Unrecognized("browserAutomation"));
    }
    if old.ingress_host != new.ingress_host {
        changes.push(SpecChange::Unrecognized("ingressHost"));
    }

    changes
}

/// Set or replace a `flag value` pair in an argument list.
///
/// If the flag is present its following value is replaced; otherwise the
/// pair is appended. A trailing flag with no value slot gets one appended.
#[must_use]
pub fn upsert_flag_value(args: &[String], flag: &str, value: &str) -> Vec<String> {
    let mut out = args.to_vec();
    if let Some(idx) = out.iter().position(|a| a == flag) {
        if idx + 1 < out.len() {
            out[idx + 1] = value.to_string();
        } else {
            out.push(value.to_string());
        }
    } else {
        out.push(flag.to_string());
        out.push(value.to_string());
    }
    out
}

/// Extract the primary container's argument list from a deployment.
#[must_use]
pub fn primary_container_args(deployment: &Deployment) -> Option<Vec<String>> {
    deployment
        .spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .iter()
        .find(|c| c.name == CONTAINER_NAME_AGENT)?
        .args
        .clone()
}

/// Apply the update actions for a changed agent spec.
///
/// Each action patches only the fields it owns; if any recognized action
/// fired, a single rollout is triggered afterwards.
///
/// # Errors
///
/// Propagates the first fatal API error; remaining actions in the pass are
/// skipped and the controller runtime requeues.
pub async fn update_agent(
    client: &Client,
    name: &str,
    old: &AgentSpec,
    new: &AgentSpec,
) -> Result<(), OperatorError> {
    new.validate(name)?;

    let namespace = naming::agent_namespace(name);
    let changes = classify_changes(old, new);

    if changes.is_empty() {
        debug!("No spec changes for agent {}, nothing to update", name);
        return Ok(());
    }

    info!(?changes, "Updating agent {}", name);

    let mut rollout_needed = false;

    for change in &changes {
        match change {
            SpecChange::SystemPrompt => {
                patch_system_prompt(client, name, &namespace, &new.system_prompt).await?;
                rollout_needed = true;
            }
            SpecChange::McpConfig => {
                let configmap = build_mcp_configmap(name, &namespace, &new.mcp_config)?;
                create_or_replace(client, &namespace, &configmap).await?;
                rollout_needed = true;
            }
            SpecChange::Version => {
                patch_image(client, name, &namespace, new.effective_version()).await?;
                rollout_needed = true;
            }
            SpecChange::DataSecrets => {
                let secret = build_data_secrets(name, &namespace, new.data_secrets.as_ref());
                create_or_replace(client, &namespace, &secret).await?;
                rollout_needed = true;
            }
            SpecChange::Unrecognized(field) => {
                warn!(
                    "Field '{}' changed on agent {} but has no update action; ignoring",
                    field, name
                );
            }
        }
    }

    if rollout_needed {
        trigger_rollout(client, name, &namespace).await?;
    }

    Ok(())
}

/// Patch only the primary container's argument list, rewriting the
/// `--system-prompt` pair.
async fn patch_system_prompt(
    client: &Client,
    name: &str,
    namespace: &str,
    prompt: &str,
) -> Result<(), OperatorError> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_name = naming::agent_deployment(name);
    let deployment = api.get(&deployment_name).await?;

    let current_args = primary_container_args(&deployment).unwrap_or_default();
    let new_args = upsert_flag_value(&current_args, SYSTEM_PROMPT_FLAG, prompt);

    // Strategic merge keys containers by name, so only the args field of the
    // primary container is touched.
    let patch = json!({
        "spec": {
            "template": {
                "spec": {
                    "containers": [{
                        "name": CONTAINER_NAME_AGENT,
                        "args": new_args,
                    }]
                }
            }
        }
    });
    api.patch(
        &deployment_name,
        &PatchParams::default(),
        &Patch::Strategic(&patch),
    )
    .await?;

    info!("Patched system prompt args for agent {}", name);
    Ok(())
}

/// Patch only the primary container's image reference.
async fn patch_image(
    client: &Client,
    name: &str,
    namespace: &str,
    version: &str,
) -> Result<(), OperatorError> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_name = naming::agent_deployment(name);

    let patch = json!({
        "spec": {
            "template": {
                "spec": {
                    "containers": [{
                        "name": CONTAINER_NAME_AGENT,
                        "image": format!("{AGENT_IMAGE}:{version}"),
                    }]
                }
            }
        }
    });
    api.patch(
        &deployment_name,
        &PatchParams::default(),
        &Patch::Strategic(&patch),
    )
    .await?;

    info!("Patched agent {} image to tag {}", name, version);
    Ok(())
}

/// Patch body bumping the pod-template rollout annotation to the current
/// time. The RFC3339 value strictly increases between invocations.
#[must_use]
pub fn rollout_patch() -> serde_json::Value {
    json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        ROLLOUT_ANNOTATION: Utc::now().to_rfc3339(),
                    }
                }
            }
        }
    })
}

/// Bump the pod-template rollout annotation so the workload controller
/// replaces running pods. Fired at most once per update pass.
async fn trigger_rollout(client: &Client, name: &str, namespace: &str) -> Result<(), OperatorError> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_name = naming::agent_deployment(name);

    let patch = rollout_patch();
    api.patch(
        &deployment_name,
        &PatchParams::default(),
        &Patch::Strategic(&patch),
    )
    .await?;

    info!("Triggered rollout for agent {}", name);
    Ok(())
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
