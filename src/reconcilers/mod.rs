// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation engine for Agentry resources.
//!
//! This module contains the reconciliation logic for both Agentry Custom
//! Resources. Each reconciler receives one event at a time from the
//! controller runtime and drives the cluster toward the desired state.
//!
//! # Reconciliation Architecture
//!
//! Agentry follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - Monitor resource changes via Kubernetes API
//! 2. **Reconcile** - Compare desired state (CRD spec) with actual state
//! 3. **Apply** - Create, replace, or patch the owned objects
//! 4. **Status** - Report reconciliation results back to Kubernetes
//!
//! # Available Reconcilers
//!
//! - [`reconcile_agent`] - Realizes and updates the long-lived agent
//!   environment (namespace, RBAC, PVCs, config, deployments, services,
//!   ingress)
//! - [`reconcile_llmrequest`] - Realizes the one-shot request runner and its
//!   static-serving stack
//!
//! Delete handling is dispatched inside each reconciler from the resource's
//! deletion timestamp; see [`agent::delete_agent`] and
//! [`llmrequest::delete_llmrequest`].

pub mod agent;
pub mod apply;
pub mod diff;
pub mod finalizers;
pub mod llmrequest;

pub use agent::{create_agent, delete_agent, reconcile_agent};
pub use apply::{
    create_if_absent, create_if_absent_cluster, create_or_replace, delete_ignore_missing, Applied,
    Removed,
};
pub use diff::{classify_changes, update_agent, SpecChange};
pub use finalizers::{ensure_finalizer, remove_finalizer};
pub use llmrequest::{create_llmrequest, delete_llmrequest, reconcile_llmrequest};
