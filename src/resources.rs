// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Kubernetes resource builders for Agentry instances.
//!
//! This module provides functions that, given an instance's name, namespace
//! and declared configuration, produce the desired specification of each
//! owned object kind (`Namespace`, `ServiceAccount`, RBAC, PVCs,
//! `ConfigMaps`, `Deployments`, `Services`, `Ingress`). All functions are
//! pure and total: no I/O, and any well-formed spec yields a complete object.
//!
//! Object names come exclusively from [`crate::naming`] so that the create
//! and delete reconcilers can never drift apart.

use crate::constants::{
    AGENT_IMAGE, API_KEY_SECRET_KEY, BROWSER_IMAGE, BROWSER_PORT, CODE_SERVER_IMAGE,
    CODE_SERVER_PORT, CONTAINER_NAME_AGENT, CONTAINER_NAME_BROWSER, CONTAINER_NAME_CODE_SERVER,
    DATA_MOUNT_PATH, DATA_PVC_SIZE, MCP_CONFIG_FILENAME, MCP_CONFIG_MOUNT_PATH,
    METADATA_MOUNT_PATH, METADATA_PVC_SIZE, NGINX_CONF_FILENAME, NGINX_CONF_MOUNT_PATH,
    NGINX_IMAGE, NGINX_PORT, REQUEST_AGENT_IMAGE, REQUEST_API_KEY_SECRET, SYSTEM_PROMPT_FLAG,
    VOLUME_DATA, VOLUME_MCP_CONFIG, VOLUME_METADATA, VOLUME_NGINX_CONFIG,
};
use crate::credentials::Credentials;
use crate::crd::{AgentSpec, LLMRequestSpec, McpConfig};
use crate::errors::OperatorError;
use crate::labels::{
    COMPONENT_AGENT, COMPONENT_BROWSER, COMPONENT_STATIC_SERVER, K8S_COMPONENT, K8S_INSTANCE,
    K8S_MANAGED_BY, K8S_NAME, K8S_PART_OF, MANAGED_BY_AGENT, MANAGED_BY_LLM_REQUEST,
    PART_OF_AGENTRY,
};
use crate::naming;
use k8s_openapi::api::{
    apps::v1::{Deployment, DeploymentSpec},
    core::v1::{
        ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, EnvFromSource, EnvVar,
        EnvVarSource, HostPathVolumeSource, Namespace, PersistentVolumeClaim,
        PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, PodSpec, PodTemplateSpec,
        Secret, SecretEnvSource, SecretKeySelector, Service, ServiceAccount, ServicePort,
        ServiceSpec, Volume, VolumeMount, VolumeResourceRequirements,
    },
    networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
        IngressServiceBackend, IngressSpec, ServiceBackendPort,
    },
    rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject},
};
use k8s_openapi::apimachinery::pkg::{
    api::resource::Quantity,
    apis::meta::v1::{LabelSelector, ObjectMeta},
    util::intstr::IntOrString,
};
use std::collections::BTreeMap;
use tracing::debug;

// Embed the nginx configuration template at compile time
const NGINX_CONF_TEMPLATE: &str = include_str!("../templates/nginx.conf.tmpl");

/// Builds standardized Kubernetes labels for an owned object.
///
/// # Arguments
///
/// * `instance_name` - Name of the owning custom resource
/// * `component` - Component value (`agent`, `browser`, `static-server`)
/// * `managed_by` - Kind of the managing controller
#[must_use]
pub fn build_labels(
    instance_name: &str,
    component: &str,
    managed_by: &str,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app".into(), instance_name.into());
    labels.insert(K8S_NAME.into(), component.into());
    labels.insert(K8S_INSTANCE.into(), instance_name.into());
    labels.insert(K8S_COMPONENT.into(), component.into());
    labels.insert(K8S_MANAGED_BY.into(), managed_by.into());
    labels.insert(K8S_PART_OF.into(), PART_OF_AGENTRY.into());
    labels
}

/// Selector labels for a workload. Restricted to the app label so pod
/// selectors stay stable even if the decorative label set evolves.
fn selector_labels(workload_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app".into(), workload_name.into());
    labels
}

// ============================================================================
// Agent: namespace, RBAC, storage
// ============================================================================

/// Builds the dedicated namespace for an agent instance.
#[must_use]
pub fn build_namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(naming::agent_namespace(name)),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Builds the `ServiceAccount` agent pods run as.
#[must_use]
pub fn build_service_account(name: &str, namespace: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(naming::service_account(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Builds the namespace-scoped Role for the agent.
///
/// Grants read access to pods, pod logs and config maps within the agent's
/// own namespace, which is what the workload needs to introspect itself and
/// reload its MCP configuration.
#[must_use]
pub fn build_role(name: &str, namespace: &str) -> Role {
    Role {
        metadata: ObjectMeta {
            name: Some(naming::role(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        rules: Some(vec![
            PolicyRule {
                api_groups: Some(vec![String::new()]),
                resources: Some(vec!["pods".into(), "pods/log".into()]),
                verbs: vec!["get".into(), "list".into(), "watch".into()],
                ..Default::default()
            },
            PolicyRule {
                api_groups: Some(vec![String::new()]),
                resources: Some(vec!["configmaps".into()]),
                verbs: vec!["get".into(), "list".into()],
                ..Default::default()
            },
        ]),
    }
}

/// Builds the `RoleBinding` tying the agent role to its service account.
#[must_use]
pub fn build_role_binding(name: &str, namespace: &str) -> RoleBinding {
    RoleBinding {
        metadata: ObjectMeta {
            name: Some(naming::role_binding(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".into(),
            kind: "Role".into(),
            name: naming::role(name),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".into(),
            name: naming::service_account(name),
            namespace: Some(namespace.into()),
            ..Default::default()
        }]),
    }
}

fn build_pvc(pvc_name: String, namespace: &str, instance_name: &str, size: &str) -> PersistentVolumeClaim {
    let mut requests = BTreeMap::new();
    requests.insert("storage".to_string(), Quantity(size.to_string()));

    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(pvc_name),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(instance_name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".into()]),
            resources: Some(VolumeResourceRequirements {
                requests: Some(requests),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the workspace data PVC.
#[must_use]
pub fn build_data_pvc(name: &str, namespace: &str) -> PersistentVolumeClaim {
    build_pvc(naming::data_pvc(name), namespace, name, DATA_PVC_SIZE)
}

/// Builds the agent metadata PVC (session state, transcripts).
#[must_use]
pub fn build_metadata_pvc(name: &str, namespace: &str) -> PersistentVolumeClaim {
    build_pvc(naming::metadata_pvc(name), namespace, name, METADATA_PVC_SIZE)
}

// ============================================================================
// Agent: secrets and config maps
// ============================================================================

/// Builds the API-key Secret for the instance from the controller-held
/// credentials.
#[must_use]
pub fn build_api_key_secret(name: &str, namespace: &str, credentials: &Credentials) -> Secret {
    let mut string_data = BTreeMap::new();
    string_data.insert(
        API_KEY_SECRET_KEY.to_string(),
        credentials.anthropic_api_key.clone(),
    );

    Secret {
        metadata: ObjectMeta {
            name: Some(naming::api_key_secret(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        string_data: Some(string_data),
        ..Default::default()
    }
}

/// Builds the data-secrets Secret carrying user-supplied credential
/// overrides. An empty Secret is produced when no overrides are declared so
/// the deployment's `envFrom` reference always resolves.
#[must_use]
pub fn build_data_secrets(
    name: &str,
    namespace: &str,
    overrides: Option<&BTreeMap<String, String>>,
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(naming::data_secrets(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        string_data: Some(overrides.cloned().unwrap_or_default()),
        ..Default::default()
    }
}

/// Render the MCP configuration blob to the JSON carried by the config map.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized.
pub fn render_mcp_config(config: &McpConfig) -> Result<String, OperatorError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Builds the MCP `ConfigMap` from the current spec.
///
/// Content is regenerated from the spec on every call; the update reconciler
/// re-invokes this builder on change rather than patching fields
/// individually.
///
/// # Errors
///
/// Returns an error if the MCP config cannot be serialized.
pub fn build_mcp_configmap(
    name: &str,
    namespace: &str,
    config: &McpConfig,
) -> Result<ConfigMap, OperatorError> {
    debug!(name = %name, namespace = %namespace, "Building MCP ConfigMap");

    let mut data = BTreeMap::new();
    data.insert(MCP_CONFIG_FILENAME.to_string(), render_mcp_config(config)?);

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(naming::mcp_configmap(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    })
}

/// Render the nginx static-serving configuration from the template.
#[must_use]
pub fn render_nginx_conf() -> String {
    NGINX_CONF_TEMPLATE
        .replace("{{PORT}}", &NGINX_PORT.to_string())
        .replace("{{ROOT}}", DATA_MOUNT_PATH)
}

/// Builds the nginx `ConfigMap` serving the output directory.
#[must_use]
pub fn build_nginx_configmap(name: &str, namespace: &str, managed_by: &str) -> ConfigMap {
    let mut data = BTreeMap::new();
    data.insert(NGINX_CONF_FILENAME.to_string(), render_nginx_conf());

    ConfigMap {
        metadata: ObjectMeta {
            name: Some(naming::nginx_configmap(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_STATIC_SERVER, managed_by)),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    }
}

// ============================================================================
// Agent: deployments
// ============================================================================

/// Builds the primary agent container.
fn build_agent_container(name: &str, spec: &AgentSpec) -> Container {
    Container {
        name: CONTAINER_NAME_AGENT.into(),
        image: Some(format!("{AGENT_IMAGE}:{}", spec.effective_version())),
        image_pull_policy: Some("Always".into()),
        args: Some(vec![
            "--auto-confirm".into(),
            SYSTEM_PROMPT_FLAG.into(),
            spec.system_prompt.clone(),
        ]),
        env: Some(vec![EnvVar {
            name: API_KEY_SECRET_KEY.into(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: naming::api_key_secret(name),
                    key: API_KEY_SECRET_KEY.into(),
                    optional: Some(false),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        env_from: Some(vec![EnvFromSource {
            secret_ref: Some(SecretEnvSource {
                name: naming::data_secrets(name),
                optional: Some(true),
            }),
            ..Default::default()
        }]),
        volume_mounts: Some(vec![
            VolumeMount {
                name: VOLUME_DATA.into(),
                mount_path: DATA_MOUNT_PATH.into(),
                ..Default::default()
            },
            VolumeMount {
                name: VOLUME_METADATA.into(),
                mount_path: METADATA_MOUNT_PATH.into(),
                ..Default::default()
            },
            VolumeMount {
                name: VOLUME_MCP_CONFIG.into(),
                mount_path: MCP_CONFIG_MOUNT_PATH.into(),
                sub_path: Some(MCP_CONFIG_FILENAME.into()),
                read_only: Some(true),
                ..Default::default()
            },
        ]),
        ..Default::default()
    }
}

/// Builds the code-server side-car container.
fn build_code_server_container() -> Container {
    Container {
        name: CONTAINER_NAME_CODE_SERVER.into(),
        image: Some(CODE_SERVER_IMAGE.into()),
        image_pull_policy: Some("IfNotPresent".into()),
        args: Some(vec![
            "--auth".into(),
            "none".into(),
            "--bind-addr".into(),
            format!("0.0.0.0:{CODE_SERVER_PORT}"),
            DATA_MOUNT_PATH.into(),
        ]),
        ports: Some(vec![ContainerPort {
            name: Some("code".into()),
            container_port: CODE_SERVER_PORT,
            protocol: Some("TCP".into()),
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: VOLUME_DATA.into(),
            mount_path: DATA_MOUNT_PATH.into(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Builds the primary deployment for an agent instance.
///
/// One or two containers: the agent workload plus, when enabled, a
/// code-server side-car sharing the workspace volume.
#[must_use]
pub fn build_agent_deployment(name: &str, namespace: &str, spec: &AgentSpec) -> Deployment {
    debug!(
        name = %name,
        namespace = %namespace,
        version = %spec.effective_version(),
        code_server = spec.code_server_enabled(),
        "Building agent Deployment"
    );

    let workload = naming::agent_deployment(name);
    let labels = build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT);
    let selector = selector_labels(&workload);

    let mut containers = vec![build_agent_container(name, spec)];
    if spec.code_server_enabled() {
        containers.push(build_code_server_container());
    }

    let volumes = vec![
        Volume {
            name: VOLUME_DATA.into(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: naming::data_pvc(name),
                ..Default::default()
            }),
            ..Default::default()
        },
        Volume {
            name: VOLUME_METADATA.into(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: naming::metadata_pvc(name),
                ..Default::default()
            }),
            ..Default::default()
        },
        Volume {
            name: VOLUME_MCP_CONFIG.into(),
            config_map: Some(ConfigMapVolumeSource {
                name: naming::mcp_configmap(name),
                ..Default::default()
            }),
            ..Default::default()
        },
    ];

    let mut pod_labels = labels.clone();
    pod_labels.extend(selector.clone());

    Deployment {
        metadata: ObjectMeta {
            name: Some(workload),
            namespace: Some(namespace.into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    service_account_name: Some(naming::service_account(name)),
                    containers,
                    volumes: Some(volumes),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the auxiliary browser automation deployment.
#[must_use]
pub fn build_browser_deployment(name: &str, namespace: &str) -> Deployment {
    let workload = naming::browser_deployment(name);
    let labels = build_labels(name, COMPONENT_BROWSER, MANAGED_BY_AGENT);
    let selector = selector_labels(&workload);

    let mut pod_labels = labels.clone();
    pod_labels.extend(selector.clone());

    Deployment {
        metadata: ObjectMeta {
            name: Some(workload),
            namespace: Some(namespace.into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: CONTAINER_NAME_BROWSER.into(),
                        image: Some(BROWSER_IMAGE.into()),
                        image_pull_policy: Some("IfNotPresent".into()),
                        command: Some(vec!["npx".into()]),
                        args: Some(vec![
                            "-y".into(),
                            "playwright".into(),
                            "run-server".into(),
                            "--port".into(),
                            BROWSER_PORT.to_string(),
                        ]),
                        ports: Some(vec![ContainerPort {
                            name: Some("browser".into()),
                            container_port: BROWSER_PORT,
                            protocol: Some("TCP".into()),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ============================================================================
// Agent: services and ingress
// ============================================================================

/// Builds the service fronting the primary agent deployment.
///
/// Exposes the code-server port; the selector targets the primary
/// deployment's pods. Only applied when the code-server side-car is
/// enabled, since no other container serves this port.
#[must_use]
pub fn build_agent_service(name: &str, namespace: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(naming::agent_deployment(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(&naming::agent_deployment(name))),
            ports: Some(vec![ServicePort {
                name: Some("code".into()),
                port: CODE_SERVER_PORT,
                target_port: Some(IntOrString::Int(CODE_SERVER_PORT)),
                protocol: Some("TCP".into()),
                ..Default::default()
            }]),
            type_: Some("ClusterIP".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the service fronting the browser automation deployment.
#[must_use]
pub fn build_browser_service(name: &str, namespace: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(naming::browser_deployment(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_BROWSER, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(&naming::browser_deployment(name))),
            ports: Some(vec![ServicePort {
                name: Some("browser".into()),
                port: BROWSER_PORT,
                target_port: Some(IntOrString::Int(BROWSER_PORT)),
                protocol: Some("TCP".into()),
                ..Default::default()
            }]),
            type_: Some("ClusterIP".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the ingress routing the configured host to the code-server port.
#[must_use]
pub fn build_code_ingress(name: &str, namespace: &str, host: &str) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some(naming::code_ingress(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(name, COMPONENT_AGENT, MANAGED_BY_AGENT)),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(vec![IngressRule {
                host: Some(host.into()),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".into()),
                        path_type: "Prefix".into(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name: naming::agent_deployment(name),
                                port: Some(ServiceBackendPort {
                                    number: Some(CODE_SERVER_PORT),
                                    ..Default::default()
                                }),
                            }),
                            ..Default::default()
                        },
                    }],
                }),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ============================================================================
// LLMRequest: one-shot runner and static server
// ============================================================================

/// Builds the one-shot runner deployment for an `LLMRequest`.
///
/// Output lands on a host-path volume shared with the nginx deployment so
/// the static server can expose it.
#[must_use]
pub fn build_request_deployment(name: &str, namespace: &str, spec: &LLMRequestSpec) -> Deployment {
    let labels = build_labels(name, COMPONENT_AGENT, MANAGED_BY_LLM_REQUEST);
    let selector = selector_labels(name);

    let mut pod_labels = labels.clone();
    pod_labels.extend(selector.clone());

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: CONTAINER_NAME_AGENT.into(),
                        image: Some(format!(
                            "{REQUEST_AGENT_IMAGE}:{}",
                            spec.effective_version()
                        )),
                        image_pull_policy: Some("Always".into()),
                        args: Some(vec![
                            "--auto-confirm".into(),
                            crate::constants::INITIAL_INPUT_FLAG.into(),
                            spec.prompt.clone(),
                        ]),
                        env: Some(vec![EnvVar {
                            name: API_KEY_SECRET_KEY.into(),
                            value_from: Some(EnvVarSource {
                                secret_key_ref: Some(SecretKeySelector {
                                    name: REQUEST_API_KEY_SECRET.into(),
                                    key: API_KEY_SECRET_KEY.into(),
                                    optional: Some(false),
                                }),
                                ..Default::default()
                            }),
                            ..Default::default()
                        }]),
                        volume_mounts: Some(vec![VolumeMount {
                            name: VOLUME_DATA.into(),
                            mount_path: DATA_MOUNT_PATH.into(),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    volumes: Some(vec![Volume {
                        name: VOLUME_DATA.into(),
                        host_path: Some(HostPathVolumeSource {
                            path: DATA_MOUNT_PATH.into(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the nginx deployment serving an `LLMRequest`'s output directory.
#[must_use]
pub fn build_request_nginx_deployment(name: &str, namespace: &str) -> Deployment {
    let workload = naming::nginx_deployment(name);
    let labels = build_labels(name, COMPONENT_STATIC_SERVER, MANAGED_BY_LLM_REQUEST);
    let selector = selector_labels(&workload);

    let mut pod_labels = labels.clone();
    pod_labels.extend(selector.clone());

    Deployment {
        metadata: ObjectMeta {
            name: Some(workload),
            namespace: Some(namespace.into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "nginx".into(),
                        image: Some(NGINX_IMAGE.into()),
                        ports: Some(vec![ContainerPort {
                            name: Some("http".into()),
                            container_port: NGINX_PORT,
                            protocol: Some("TCP".into()),
                            ..Default::default()
                        }]),
                        volume_mounts: Some(vec![
                            VolumeMount {
                                name: VOLUME_DATA.into(),
                                mount_path: DATA_MOUNT_PATH.into(),
                                read_only: Some(true),
                                ..Default::default()
                            },
                            VolumeMount {
                                name: VOLUME_NGINX_CONFIG.into(),
                                mount_path: NGINX_CONF_MOUNT_PATH.into(),
                                sub_path: Some(NGINX_CONF_FILENAME.into()),
                                ..Default::default()
                            },
                        ]),
                        ..Default::default()
                    }],
                    volumes: Some(vec![
                        Volume {
                            name: VOLUME_DATA.into(),
                            host_path: Some(HostPathVolumeSource {
                                path: DATA_MOUNT_PATH.into(),
                                ..Default::default()
                            }),
                            ..Default::default()
                        },
                        Volume {
                            name: VOLUME_NGINX_CONFIG.into(),
                            config_map: Some(ConfigMapVolumeSource {
                                name: naming::nginx_configmap(name),
                                ..Default::default()
                            }),
                            ..Default::default()
                        },
                    ]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the service exposing an `LLMRequest`'s nginx deployment.
#[must_use]
pub fn build_request_nginx_service(name: &str, namespace: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(naming::nginx_deployment(name)),
            namespace: Some(namespace.into()),
            labels: Some(build_labels(
                name,
                COMPONENT_STATIC_SERVER,
                MANAGED_BY_LLM_REQUEST,
            )),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(&naming::nginx_deployment(name))),
            ports: Some(vec![ServicePort {
                name: Some("http".into()),
                port: NGINX_PORT,
                target_port: Some(IntOrString::Int(NGINX_PORT)),
                protocol: Some("TCP".into()),
                ..Default::default()
            }]),
            type_: Some("ClusterIP".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod resources_tests;
