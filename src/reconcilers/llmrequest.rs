// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! `LLMRequest` reconciliation logic.
//!
//! The one-shot variant: a runner deployment executes the prompt and an
//! nginx static server exposes its output directory. Owned objects live in
//! the request's own namespace; the set is small enough that updates are
//! handled by re-running the create path (every step is idempotent and the
//! nginx config map is replace-on-conflict).

use crate::constants::LLM_REQUEST_FINALIZER;
use crate::crd::{Condition, LLMRequest, LLMRequestStatus};
use crate::errors::OperatorError;
use crate::labels::MANAGED_BY_LLM_REQUEST;
use crate::naming;
use crate::reconcilers::apply::{create_if_absent, create_or_replace, delete_ignore_missing};
use crate::reconcilers::finalizers::{ensure_finalizer, remove_finalizer};
use crate::resources::{
    build_nginx_configmap, build_request_deployment, build_request_nginx_deployment,
    build_request_nginx_service,
};
use anyhow::Result;
use chrono::Utc;
use k8s_openapi::api::{
    apps::v1::Deployment,
    core::v1::{ConfigMap, Service},
};
use kube::{
    api::{Patch, PatchParams},
    client::Client,
    Api, ResourceExt,
};
use serde_json::json;
use tracing::{error, info, warn};

/// Reconcile one `LLMRequest` resource in response to one event.
///
/// # Errors
///
/// Returns an error if the reconciliation pass failed; the controller
/// runtime requeues.
pub async fn reconcile_llmrequest(client: Client, request: LLMRequest) -> Result<()> {
    let name = request.name_any();
    let namespace = request.namespace().unwrap_or_default();

    if request.metadata.deletion_timestamp.is_some() {
        info!("LLMRequest {}/{} marked for deletion, tearing down", namespace, name);
        delete_llmrequest(&client, &namespace, &name).await?;
        remove_finalizer(&client, &request, LLM_REQUEST_FINALIZER).await?;
        return Ok(());
    }

    // Fail fast on an invalid spec, before any store call.
    request.spec.validate(&name)?;

    ensure_finalizer(&client, &request, LLM_REQUEST_FINALIZER).await?;

    match create_llmrequest(&client, &namespace, &request).await {
        Ok(()) => {
            update_status(&client, &request, "True", "Reconciled", "All owned objects applied")
                .await?;
            Ok(())
        }
        Err(e) => {
            error!("Failed to reconcile LLMRequest {}/{}: {}", namespace, name, e);
            // Status is best-effort here: the original error drives the
            // requeue, not a failed status patch.
            if let Err(status_err) = update_status(
                &client,
                &request,
                "False",
                "ReconcileFailed",
                &format!("Reconciliation failed: {e}"),
            )
            .await
            {
                warn!(
                    "Failed to record failure status for LLMRequest {}/{}: {}",
                    namespace, name, status_err
                );
            }
            Err(e.into())
        }
    }
}

/// Create the owned objects for an `LLMRequest`, tolerating partial
/// pre-existence from an earlier failed pass.
///
/// # Errors
///
/// Propagates the first fatal API error.
pub async fn create_llmrequest(
    client: &Client,
    namespace: &str,
    request: &LLMRequest,
) -> Result<(), OperatorError> {
    let name = request.name_any();
    request.spec.validate(&name)?;

    // Runner deployment first, then the static-serving stack.
    create_if_absent(client, namespace, &build_request_deployment(&name, namespace, &request.spec))
        .await?;

    create_or_replace(
        client,
        namespace,
        &build_nginx_configmap(&name, namespace, MANAGED_BY_LLM_REQUEST),
    )
    .await?;
    create_if_absent(client, namespace, &build_request_nginx_deployment(&name, namespace))
        .await?;
    create_if_absent(client, namespace, &build_request_nginx_service(&name, namespace)).await?;

    info!("Created all owned objects for LLMRequest {}/{}", namespace, name);
    Ok(())
}

/// Tear down every owned object of an `LLMRequest`, by recomputed name.
///
/// # Errors
///
/// Propagates the first fatal API error; "not found" on any kind is benign.
pub async fn delete_llmrequest(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<(), OperatorError> {
    delete_ignore_missing::<Service>(client, namespace, &naming::nginx_deployment(name)).await?;
    delete_ignore_missing::<Deployment>(client, namespace, name).await?;
    delete_ignore_missing::<Deployment>(client, namespace, &naming::nginx_deployment(name))
        .await?;
    delete_ignore_missing::<ConfigMap>(client, namespace, &naming::nginx_configmap(name)).await?;

    info!("Deleted owned objects for LLMRequest {}/{}", namespace, name);
    Ok(())
}

/// Patch the status subresource with a single Ready condition.
async fn update_status(
    client: &Client,
    request: &LLMRequest,
    status: &str,
    reason: &str,
    message: &str,
) -> Result<(), OperatorError> {
    let namespace = request.namespace().unwrap_or_default();
    let api: Api<LLMRequest> = Api::namespaced(client.clone(), &namespace);

    let new_status = LLMRequestStatus {
        conditions: vec![Condition {
            r#type: "Ready".to_string(),
            status: status.to_string(),
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            last_transition_time: Some(Utc::now().to_rfc3339()),
        }],
        observed_generation: request.metadata.generation,
    };

    let patch = json!({ "status": new_status });
    api.patch_status(
        &request.name_any(),
        &PatchParams::default(),
        &Patch::Merge(&patch),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
#[path = "llmrequest_tests.rs"]
mod llmrequest_tests;
