// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Existence-aware create/delete helpers for owned Kubernetes objects.
//!
//! Every owned object is realized through one of three operations:
//!
//! - [`create_if_absent`] - for immutable/one-shot kinds (namespace, service
//!   account, RBAC, PVCs, deployments, services, ingresses). A 409 Conflict
//!   from the API server means a previous partial pass already created the
//!   object; it is left untouched and reported as [`Applied::AlreadyExists`].
//! - [`create_or_replace`] - for mutable config kinds (generated config maps,
//!   secrets). A 409 triggers a full replace with the freshly generated
//!   content, so the object always tracks the latest spec.
//! - [`delete_ignore_missing`] - best-effort teardown. A 404 means the object
//!   was never created or is already gone; both are success.
//!
//! Any other API error propagates and aborts the remainder of the current
//! reconciliation pass. No retries happen here; the controller runtime
//! requeues and the whole pass is safe to repeat from the start.

use crate::errors::{is_conflict, is_not_found, OperatorError};
use kube::api::{DeleteParams, PostParams};
use kube::core::{ClusterResourceScope, NamespaceResourceScope};
use kube::{Api, Client, Resource, ResourceExt};
use tracing::{debug, info};

/// Outcome of an apply operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The object did not exist and was created.
    Created,
    /// The object already existed and was left untouched.
    AlreadyExists,
    /// The object already existed and was replaced with regenerated content.
    Updated,
}

/// Outcome of a delete operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removed {
    /// The object existed and deletion was issued.
    Deleted,
    /// The object was not found; nothing to do.
    NotFound,
}

/// Create a namespaced object, treating "already exists" as success.
///
/// # Errors
///
/// Propagates any API error other than a 409 Conflict.
pub async fn create_if_absent<T>(
    client: &Client,
    namespace: &str,
    resource: &T,
) -> Result<Applied, OperatorError>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    let name = resource.name_any();
    let api: Api<T> = Api::namespaced(client.clone(), namespace);

    match api.create(&PostParams::default(), resource).await {
        Ok(_) => {
            info!("Created {} {}/{}", T::kind(&()), namespace, name);
            Ok(Applied::Created)
        }
        Err(e) if is_conflict(&e) => {
            debug!(
                "{} {}/{} already exists, leaving untouched",
                T::kind(&()),
                namespace,
                name
            );
            Ok(Applied::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create a cluster-scoped object, treating "already exists" as success.
///
/// # Errors
///
/// Propagates any API error other than a 409 Conflict.
pub async fn create_if_absent_cluster<T>(
    client: &Client,
    resource: &T,
) -> Result<Applied, OperatorError>
where
    T: Resource<DynamicType = (), Scope = ClusterResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    let name = resource.name_any();
    let api: Api<T> = Api::all(client.clone());

    match api.create(&PostParams::default(), resource).await {
        Ok(_) => {
            info!("Created {} {}", T::kind(&()), name);
            Ok(Applied::Created)
        }
        Err(e) if is_conflict(&e) => {
            debug!("{} {} already exists, leaving untouched", T::kind(&()), name);
            Ok(Applied::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create a namespaced object, replacing it with the regenerated content if
/// it already exists. Used for the mutable config kinds whose content must
/// track the latest spec rather than first-write-wins.
///
/// # Errors
///
/// Propagates any API error other than the 409 Conflict handled by the
/// replace path.
pub async fn create_or_replace<T>(
    client: &Client,
    namespace: &str,
    resource: &T,
) -> Result<Applied, OperatorError>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>,
{
    let name = resource.name_any();
    let api: Api<T> = Api::namespaced(client.clone(), namespace);

    match api.create(&PostParams::default(), resource).await {
        Ok(_) => {
            info!("Created {} {}/{}", T::kind(&()), namespace, name);
            Ok(Applied::Created)
        }
        Err(e) if is_conflict(&e) => {
            // Carry over the live resourceVersion so the replace is accepted.
            let existing = api.get(&name).await?;
            let mut replacement = resource.clone();
            replacement
                .meta_mut()
                .resource_version
                .clone_from(&existing.meta().resource_version);
            api.replace(&name, &PostParams::default(), &replacement)
                .await?;
            info!("Replaced {} {}/{}", T::kind(&()), namespace, name);
            Ok(Applied::Updated)
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a namespaced object by name, treating "not found" as success.
///
/// # Errors
///
/// Propagates any API error other than a 404 Not Found.
pub async fn delete_ignore_missing<T>(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<Removed, OperatorError>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + std::fmt::Debug
        + serde::de::DeserializeOwned,
{
    let api: Api<T> = Api::namespaced(client.clone(), namespace);

    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deleted {} {}/{}", T::kind(&()), namespace, name);
            Ok(Removed::Deleted)
        }
        Err(e) if is_not_found(&e) => {
            debug!("{} {}/{} not found, nothing to delete", T::kind(&()), namespace, name);
            Ok(Removed::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
