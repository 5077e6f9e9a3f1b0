// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Agent reconciliation logic.
//!
//! One reconciliation pass per event, dispatched from [`reconcile_agent`]:
//!
//! - a resource with a deletion timestamp goes to the delete reconciler,
//!   which tears down every owned object by recomputed name;
//! - a resource without a recorded last-applied spec goes to the create
//!   reconciler, which realizes the full owned-object graph in a fixed
//!   order;
//! - otherwise the update reconciler diffs the recorded spec against the
//!   current one and applies the minimal patches.
//!
//! Every step is idempotent, so a pass that fails partway is safe to repeat
//! from the start when the controller runtime requeues. No rollback is
//! attempted. The engine assumes at most one pass per instance in flight at
//! a time, which the controller runtime guarantees.

use crate::constants::{AGENT_FINALIZER, LAST_APPLIED_ANNOTATION};
use crate::credentials::Credentials;
use crate::crd::{Agent, AgentSpec, AgentStatus, Condition};
use crate::errors::OperatorError;
use crate::naming;
use crate::reconcilers::apply::{
    create_if_absent, create_if_absent_cluster, create_or_replace, delete_ignore_missing,
};
use crate::reconcilers::diff::update_agent;
use crate::reconcilers::finalizers::{ensure_finalizer, remove_finalizer};
use crate::resources::{
    build_agent_deployment, build_agent_service, build_api_key_secret, build_browser_deployment,
    build_browser_service, build_code_ingress, build_data_pvc, build_data_secrets,
    build_metadata_pvc, build_mcp_configmap, build_namespace, build_role, build_role_binding,
    build_service_account,
};
use anyhow::Result;
use chrono::Utc;
use k8s_openapi::api::{
    apps::v1::Deployment,
    core::v1::{ConfigMap, PersistentVolumeClaim, Secret, Service, ServiceAccount},
    networking::v1::Ingress,
    rbac::v1::{Role, RoleBinding},
};
use kube::{
    api::{Patch, PatchParams},
    client::Client,
    Api, ResourceExt,
};
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Reconcile one `Agent` resource in response to one event.
///
/// # Errors
///
/// Returns an error if the reconciliation pass failed; the controller
/// runtime requeues and the pass repeats from the start.
pub async fn reconcile_agent(
    client: Client,
    agent: Agent,
    credentials: &Credentials,
) -> Result<()> {
    let name = agent.name_any();

    if agent.metadata.deletion_timestamp.is_some() {
        info!("Agent {} marked for deletion, tearing down", name);
        delete_agent(&client, &name).await?;
        remove_finalizer(&client, &agent, AGENT_FINALIZER).await?;
        return Ok(());
    }

    // Fail fast on an invalid spec, before any store call.
    agent.spec.validate(&name)?;

    ensure_finalizer(&client, &agent, AGENT_FINALIZER).await?;

    let outcome = match last_applied_spec(&agent) {
        None => {
            info!("Reconciling new Agent: {}", name);
            create_agent(&client, &name, &agent.spec, credentials).await
        }
        Some(old) => {
            debug!("Agent {} seen before, diffing against last applied spec", name);
            update_agent(&client, &name, &old, &agent.spec).await
        }
    };

    match outcome {
        Ok(()) => {
            record_applied_spec(&client, &agent).await?;
            update_status(&client, &agent, "True", "Reconciled", "All owned objects applied")
                .await?;
            Ok(())
        }
        Err(e) => {
            error!("Failed to reconcile Agent {}: {}", name, e);
            // Status is best-effort here: the original error drives the
            // requeue, not a failed status patch.
            if let Err(status_err) = update_status(
                &client,
                &agent,
                "False",
                "ReconcileFailed",
                &format!("Reconciliation failed: {e}"),
            )
            .await
            {
                warn!(
                    "Failed to record failure status for Agent {}: {}",
                    name, status_err
                );
            }
            Err(e.into())
        }
    }
}

/// Create the full owned-object graph for a new agent instance.
///
/// Steps run in a fixed total order; each tolerates pre-existence from a
/// previous partial pass. A fatal error aborts the remaining steps without
/// rolling back earlier ones.
///
/// # Errors
///
/// Propagates the first fatal API error.
pub async fn create_agent(
    client: &Client,
    name: &str,
    spec: &AgentSpec,
    credentials: &Credentials,
) -> Result<(), OperatorError> {
    spec.validate(name)?;

    let namespace = naming::agent_namespace(name);

    // 1. Dedicated namespace
    create_if_absent_cluster(client, &build_namespace(name)).await?;

    // 2. Secrets (deployment mounts them, so they come before workloads)
    create_or_replace(client, &namespace, &build_api_key_secret(name, &namespace, credentials))
        .await?;
    create_or_replace(
        client,
        &namespace,
        &build_data_secrets(name, &namespace, spec.data_secrets.as_ref()),
    )
    .await?;

    // 3-5. Service account, role, role binding
    create_if_absent(client, &namespace, &build_service_account(name, &namespace)).await?;
    create_if_absent(client, &namespace, &build_role(name, &namespace)).await?;
    create_if_absent(client, &namespace, &build_role_binding(name, &namespace)).await?;

    // 6. PVCs
    create_if_absent(client, &namespace, &build_data_pvc(name, &namespace)).await?;
    create_if_absent(client, &namespace, &build_metadata_pvc(name, &namespace)).await?;

    // 7. Config maps (mutable kind: content tracks the latest spec)
    let mcp = build_mcp_configmap(name, &namespace, &spec.mcp_config)?;
    create_or_replace(client, &namespace, &mcp).await?;

    // 8. Primary deployment
    create_if_absent(client, &namespace, &build_agent_deployment(name, &namespace, spec)).await?;

    // 9. Auxiliary deployments
    if spec.browser_enabled() {
        create_if_absent(client, &namespace, &build_browser_deployment(name, &namespace)).await?;
    }

    // 10. Services (each gated on the toggle of the workload it fronts)
    if spec.code_server_enabled() {
        create_if_absent(client, &namespace, &build_agent_service(name, &namespace)).await?;
    }
    if spec.browser_enabled() {
        create_if_absent(client, &namespace, &build_browser_service(name, &namespace)).await?;
    }

    // 11. Ingresses
    if let Some(host) = &spec.ingress_host {
        create_if_absent(client, &namespace, &build_code_ingress(name, &namespace, host)).await?;
    }

    info!("Created all owned objects for agent {}", name);
    Ok(())
}

/// Tear down every owned object of an agent instance, by recomputed name.
///
/// Safe to invoke even if creation partially failed or never ran: every
/// delete tolerates "not found". Workloads go before the PVCs they mount to
/// avoid transient mount-busy errors. The dedicated namespace is retained.
///
/// # Errors
///
/// Propagates the first fatal API error; remaining deletions are retried on
/// the next pass.
pub async fn delete_agent(client: &Client, name: &str) -> Result<(), OperatorError> {
    let namespace = naming::agent_namespace(name);

    delete_ignore_missing::<Ingress>(client, &namespace, &naming::code_ingress(name)).await?;

    delete_ignore_missing::<Service>(client, &namespace, &naming::agent_deployment(name)).await?;
    delete_ignore_missing::<Service>(client, &namespace, &naming::browser_deployment(name))
        .await?;

    delete_ignore_missing::<Deployment>(client, &namespace, &naming::agent_deployment(name))
        .await?;
    delete_ignore_missing::<Deployment>(client, &namespace, &naming::browser_deployment(name))
        .await?;

    delete_ignore_missing::<ConfigMap>(client, &namespace, &naming::mcp_configmap(name)).await?;

    delete_ignore_missing::<Secret>(client, &namespace, &naming::api_key_secret(name)).await?;
    delete_ignore_missing::<Secret>(client, &namespace, &naming::data_secrets(name)).await?;

    delete_ignore_missing::<PersistentVolumeClaim>(client, &namespace, &naming::data_pvc(name))
        .await?;
    delete_ignore_missing::<PersistentVolumeClaim>(client, &namespace, &naming::metadata_pvc(name))
        .await?;

    delete_ignore_missing::<RoleBinding>(client, &namespace, &naming::role_binding(name)).await?;
    delete_ignore_missing::<Role>(client, &namespace, &naming::role(name)).await?;
    delete_ignore_missing::<ServiceAccount>(client, &namespace, &naming::service_account(name))
        .await?;

    // The dedicated namespace is retained; it is cheap, and deleting it
    // would race any PVC finalizers still in flight.
    info!("Deleted owned objects for agent {} (namespace retained)", name);
    Ok(())
}

/// Decode the spec recorded on the resource by the previous successful pass.
#[must_use]
pub fn last_applied_spec(agent: &Agent) -> Option<AgentSpec> {
    let raw = agent
        .metadata
        .annotations
        .as_ref()?
        .get(LAST_APPLIED_ANNOTATION)?;
    match serde_json::from_str(raw) {
        Ok(spec) => Some(spec),
        Err(e) => {
            warn!(
                "Unreadable last-applied annotation on agent {}: {}; treating as fresh create",
                agent.name_any(),
                e
            );
            None
        }
    }
}

/// Record the just-applied spec on the resource so the next pass can diff
/// against it.
async fn record_applied_spec(client: &Client, agent: &Agent) -> Result<(), OperatorError> {
    let namespace = agent.namespace().unwrap_or_default();
    let api: Api<Agent> = Api::namespaced(client.clone(), &namespace);

    let patch = json!({
        "metadata": {
            "annotations": {
                LAST_APPLIED_ANNOTATION: serde_json::to_string(&agent.spec)?,
            }
        }
    });
    api.patch(&agent.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Patch the status subresource with a single Ready condition.
async fn update_status(
    client: &Client,
    agent: &Agent,
    status: &str,
    reason: &str,
    message: &str,
) -> Result<(), OperatorError> {
    let namespace = agent.namespace().unwrap_or_default();
    let api: Api<Agent> = Api::namespaced(client.clone(), &namespace);

    let new_status = AgentStatus {
        conditions: vec![Condition {
            r#type: "Ready".to_string(),
            status: status.to_string(),
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            last_transition_time: Some(Utc::now().to_rfc3339()),
        }],
        observed_generation: agent.metadata.generation,
    };

    let patch = json!({ "status": new_status });
    api.patch_status(
        &agent.name_any(),
        &PatchParams::default(),
        &Patch::Merge(&patch),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod agent_tests;
