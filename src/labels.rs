// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Common label constants used across all reconcilers.
//!
//! This module defines standard Kubernetes labels and Agentry-specific labels
//! to ensure consistency across all resources created by the controller.

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the component name within the architecture (e.g., "agent", "static-server")
pub const K8S_COMPONENT: &str = "app.kubernetes.io/component";

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for the name of the application
pub const K8S_NAME: &str = "app.kubernetes.io/name";

/// Standard label for a unique name identifying the instance of an application
pub const K8S_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

// ============================================================================
// Kubernetes Standard Label Values
// ============================================================================

/// Value for `app.kubernetes.io/part-of` indicating a resource belongs to Agentry
pub const PART_OF_AGENTRY: &str = "agentry";

/// Component value for the agent workload
pub const COMPONENT_AGENT: &str = "agent";

/// Component value for the browser automation server
pub const COMPONENT_BROWSER: &str = "browser";

/// Component value for the nginx static server
pub const COMPONENT_STATIC_SERVER: &str = "static-server";

/// Value for `app.kubernetes.io/managed-by` when a resource is managed by the `Agent` controller
pub const MANAGED_BY_AGENT: &str = "Agent";

/// Value for `app.kubernetes.io/managed-by` when a resource is managed by the `LLMRequest` controller
pub const MANAGED_BY_LLM_REQUEST: &str = "LLMRequest";
