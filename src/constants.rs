// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Global constants for the Agentry operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all Agentry CRDs
pub const API_GROUP: &str = "agentry.dev";

/// API version for all Agentry CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "agentry.dev/v1alpha1";

/// Kind name for the `Agent` resource
pub const KIND_AGENT: &str = "Agent";

/// Kind name for the `LLMRequest` resource
pub const KIND_LLM_REQUEST: &str = "LLMRequest";

/// Finalizer attached to `Agent` resources while their owned objects exist
pub const AGENT_FINALIZER: &str = "agent.agentry.dev/finalizer";

/// Finalizer attached to `LLMRequest` resources while their owned objects exist
pub const LLM_REQUEST_FINALIZER: &str = "llmrequest.agentry.dev/finalizer";

// ============================================================================
// Annotation Keys
// ============================================================================

/// Annotation on an `Agent` recording the last spec the controller applied.
/// The update reconciler diffs the current spec against this value.
pub const LAST_APPLIED_ANNOTATION: &str = "agentry.dev/last-applied-spec";

/// Pod-template annotation bumped to force a rollout of running pods
pub const ROLLOUT_ANNOTATION: &str = "agentry.dev/restarted-at";

// ============================================================================
// Container Images
// ============================================================================

/// Agent workload image repository (tag appended from spec.version)
pub const AGENT_IMAGE: &str = "ghcr.io/agentry-dev/agent";

/// One-shot prompt runner image for `LLMRequest` workloads
pub const REQUEST_AGENT_IMAGE: &str = "wholelottahoopla/bash-agent";

/// Code-server side-car image
pub const CODE_SERVER_IMAGE: &str = "codercom/code-server:latest";

/// Browser automation server image
pub const BROWSER_IMAGE: &str = "mcr.microsoft.com/playwright:v1.49.0-noble";

/// Static file server image
pub const NGINX_IMAGE: &str = "nginx:latest";

/// Default image tag when spec.version is not set
pub const DEFAULT_VERSION: &str = "latest";

// ============================================================================
// Container Names
// ============================================================================

/// Name of the primary agent container inside the primary deployment
pub const CONTAINER_NAME_AGENT: &str = "agent";

/// Name of the code-server side-car container
pub const CONTAINER_NAME_CODE_SERVER: &str = "code-server";

/// Name of the browser automation container
pub const CONTAINER_NAME_BROWSER: &str = "browser";

// ============================================================================
// Ports
// ============================================================================

/// Code-server HTTP port
pub const CODE_SERVER_PORT: i32 = 8443;

/// Browser automation server port
pub const BROWSER_PORT: i32 = 3000;

/// nginx static server port
pub const NGINX_PORT: i32 = 80;

// ============================================================================
// Mount Paths and Volume Names
// ============================================================================

/// Workspace data mount path (shared with the static server)
pub const DATA_MOUNT_PATH: &str = "/data/output";

/// Agent metadata mount path (session state, transcripts)
pub const METADATA_MOUNT_PATH: &str = "/var/lib/agentry";

/// MCP configuration mount path inside agent pods
pub const MCP_CONFIG_MOUNT_PATH: &str = "/etc/agentry/mcp.json";

/// File name of the MCP config inside its `ConfigMap`
pub const MCP_CONFIG_FILENAME: &str = "mcp.json";

/// File name of the nginx config inside its `ConfigMap`
pub const NGINX_CONF_FILENAME: &str = "nginx.conf";

/// nginx configuration mount path
pub const NGINX_CONF_MOUNT_PATH: &str = "/etc/nginx/nginx.conf";

/// Volume name for the workspace data volume
pub const VOLUME_DATA: &str = "data";

/// Volume name for the agent metadata volume
pub const VOLUME_METADATA: &str = "metadata";

/// Volume name for the MCP config volume
pub const VOLUME_MCP_CONFIG: &str = "mcp-config";

/// Volume name for the nginx config volume
pub const VOLUME_NGINX_CONFIG: &str = "nginx-config";

// ============================================================================
// Storage
// ============================================================================

/// Requested size of the workspace data PVC
pub const DATA_PVC_SIZE: &str = "10Gi";

/// Requested size of the agent metadata PVC
pub const METADATA_PVC_SIZE: &str = "1Gi";

// ============================================================================
// Secrets and Environment
// ============================================================================

/// Key under which the Anthropic API key is stored in the API-key secret
pub const API_KEY_SECRET_KEY: &str = "ANTHROPIC_API_KEY";

/// Name of the pre-provisioned secret `LLMRequest` workloads read their key from
pub const REQUEST_API_KEY_SECRET: &str = "anthropic-api-key";

// ============================================================================
// Command-line Flags for the Agent Workload
// ============================================================================

/// Flag carrying the system prompt into the agent container
pub const SYSTEM_PROMPT_FLAG: &str = "--system-prompt";

/// Flag carrying the one-shot user prompt into the request runner
pub const INITIAL_INPUT_FLAG: &str = "--initial-user-input";

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration after a successful reconciliation (5 minutes)
pub const READY_REQUEUE_DURATION_SECS: u64 = 300;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for the Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for the Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for the metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";
