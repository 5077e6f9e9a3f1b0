// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Agentry - LLM Agent Operator for Kubernetes
//!
//! Agentry is a Kubernetes operator written in Rust that provisions and
//! manages LLM agent workloads through Custom Resource Definitions (CRDs).
//!
//! ## Overview
//!
//! This library provides the core functionality for the Agentry operator,
//! including:
//!
//! - Custom Resource Definitions for agents and one-shot LLM requests
//! - Pure resource template builders for every owned object
//! - Existence-aware apply/delete helpers and diff-driven updates
//! - Integration with the Kubernetes API server
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types
//! - [`reconcilers`] - Reconciliation logic for each resource type
//! - [`resources`] - Pure builders for the owned Kubernetes objects
//! - [`naming`] - Deterministic owned-object naming
//! - [`credentials`] - Operator credential configuration
//! - [`metrics`] - Prometheus metrics and the `/metrics` endpoint
//!
//! ## Example
//!
//! ```rust
//! use agentry::crd::{AgentSpec, McpConfig};
//! use agentry::resources::build_agent_deployment;
//!
//! let spec = AgentSpec {
//!     system_prompt: "You are a helpful assistant.".to_string(),
//!     mcp_config: McpConfig::default(),
//!     version: None,
//!     data_secrets: None,
//!     code_server: None,
//!     browser_automation: None,
//!     ingress_host: None,
//! };
//!
//! let deployment = build_agent_deployment("demo", "demo", &spec);
//! assert_eq!(deployment.metadata.name.as_deref(), Some("demo"));
//! ```

pub mod constants;
pub mod crd;
pub mod credentials;
pub mod errors;
pub mod labels;
pub mod metrics;
pub mod naming;
pub mod reconcilers;
pub mod resources;
