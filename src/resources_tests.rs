// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

//! Unit tests for `resources.rs`
//!
//! Builders are pure, so these tests assert directly on the produced
//! objects: names, labels, container wiring, volumes and ports.

use super::*;
use crate::constants::{CODE_SERVER_PORT, NGINX_PORT};

fn minimal_agent_spec() -> AgentSpec {
    AgentSpec {
        system_prompt: "You are a helpful assistant.".to_string(),
        mcp_config: McpConfig::default(),
        version: None,
        data_secrets: None,
        code_server: None,
        browser_automation: None,
        ingress_host: None,
    }
}

#[test]
fn test_build_labels_carries_standard_set() {
    let labels = build_labels("demo", COMPONENT_AGENT, MANAGED_BY_AGENT);
    assert_eq!(labels.get("app").map(String::as_str), Some("demo"));
    assert_eq!(labels.get(K8S_INSTANCE).map(String::as_str), Some("demo"));
    assert_eq!(labels.get(K8S_COMPONENT).map(String::as_str), Some("agent"));
    assert_eq!(labels.get(K8S_MANAGED_BY).map(String::as_str), Some("Agent"));
    assert_eq!(
        labels.get(K8S_PART_OF).map(String::as_str),
        Some(PART_OF_AGENTRY)
    );
}

#[test]
fn test_build_namespace_uses_instance_name() {
    let ns = build_namespace("demo");
    assert_eq!(ns.metadata.name.as_deref(), Some("demo"));
    assert!(ns.metadata.labels.is_some());
}

#[test]
fn test_build_role_grants_read_only_access() {
    let role = build_role("demo", "demo");
    assert_eq!(role.metadata.name.as_deref(), Some("demo-agent-role"));

    let rules = role.rules.expect("role must carry rules");
    assert_eq!(rules.len(), 2);
    let pod_rule = &rules[0];
    assert_eq!(
        pod_rule.resources.as_deref(),
        Some(&["pods".to_string(), "pods/log".to_string()][..])
    );
    assert!(pod_rule.verbs.contains(&"watch".to_string()));
    // No write verbs anywhere.
    for rule in &rules {
        for verb in &rule.verbs {
            assert!(
                matches!(verb.as_str(), "get" | "list" | "watch"),
                "unexpected verb {verb}"
            );
        }
    }
}

#[test]
fn test_build_role_binding_ties_role_to_service_account() {
    let rb = build_role_binding("demo", "demo");
    assert_eq!(rb.role_ref.kind, "Role");
    assert_eq!(rb.role_ref.name, "demo-agent-role");
    let subjects = rb.subjects.expect("role binding must carry subjects");
    assert_eq!(subjects[0].kind, "ServiceAccount");
    assert_eq!(subjects[0].name, "demo-agent-sa");
}

#[test]
fn test_build_pvcs() {
    let data = build_data_pvc("demo", "demo");
    assert_eq!(data.metadata.name.as_deref(), Some("demo-data"));
    let spec = data.spec.expect("pvc spec");
    assert_eq!(
        spec.access_modes.as_deref(),
        Some(&["ReadWriteOnce".to_string()][..])
    );
    let requests = spec.resources.unwrap().requests.unwrap();
    assert_eq!(requests.get("storage").unwrap().0, "10Gi");

    let metadata = build_metadata_pvc("demo", "demo");
    assert_eq!(metadata.metadata.name.as_deref(), Some("demo-metadata"));
    let requests = metadata
        .spec
        .unwrap()
        .resources
        .unwrap()
        .requests
        .unwrap();
    assert_eq!(requests.get("storage").unwrap().0, "1Gi");
}

#[test]
fn test_build_api_key_secret_holds_controller_credential() {
    let creds = Credentials::new("sk-test-abc");
    let secret = build_api_key_secret("demo", "demo", &creds);
    assert_eq!(secret.metadata.name.as_deref(), Some("demo-api-key"));
    let data = secret.string_data.expect("string data");
    assert_eq!(
        data.get("ANTHROPIC_API_KEY").map(String::as_str),
        Some("sk-test-abc")
    );
}

#[test]
fn test_build_data_secrets_empty_when_no_overrides() {
    // The deployment's envFrom reference must always resolve, so an empty
    // Secret is produced rather than none at all.
    let secret = build_data_secrets("demo", "demo", None);
    assert_eq!(secret.metadata.name.as_deref(), Some("demo-data-secrets"));
    assert_eq!(secret.string_data, Some(BTreeMap::new()));
}

#[test]
fn test_build_data_secrets_carries_overrides() {
    let overrides: BTreeMap<String, String> =
        [("GITHUB_TOKEN".to_string(), "t0ken".to_string())]
            .into_iter()
            .collect();
    let secret = build_data_secrets("demo", "demo", Some(&overrides));
    assert_eq!(
        secret.string_data.unwrap().get("GITHUB_TOKEN").unwrap(),
        "t0ken"
    );
}

#[test]
fn test_render_mcp_config_is_valid_json() {
    let mut config = McpConfig::default();
    config.servers.insert(
        "fetch".to_string(),
        crate::crd::McpServer {
            command: Some("uvx".to_string()),
            args: Some(vec!["mcp-server-fetch".to_string()]),
            env: None,
            url: None,
        },
    );
    let rendered = render_mcp_config(&config).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["servers"]["fetch"]["command"], "uvx");
}

#[test]
fn test_build_mcp_configmap_carries_rendered_file() {
    let cm = build_mcp_configmap("demo", "demo", &McpConfig::default()).unwrap();
    assert_eq!(cm.metadata.name.as_deref(), Some("demo-mcp-config"));
    assert!(cm.data.unwrap().contains_key("mcp.json"));
}

#[test]
fn test_render_nginx_conf_substitutes_port_and_root() {
    let conf = render_nginx_conf();
    assert!(conf.contains(&format!("listen {NGINX_PORT}")));
    assert!(conf.contains("root /data/output"));
    assert!(!conf.contains("{{"), "all placeholders must be substituted");
}

#[test]
fn test_build_agent_deployment_default_has_code_server_sidecar() {
    let deployment = build_agent_deployment("demo", "demo", &minimal_agent_spec());
    assert_eq!(deployment.metadata.name.as_deref(), Some("demo"));

    let pod = deployment.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.service_account_name.as_deref(), Some("demo-agent-sa"));
    assert_eq!(pod.containers.len(), 2);
    assert_eq!(pod.containers[0].name, "agent");
    assert_eq!(pod.containers[1].name, "code-server");
}

#[test]
fn test_build_agent_deployment_without_code_server() {
    let mut spec = minimal_agent_spec();
    spec.code_server = Some(false);
    let deployment = build_agent_deployment("demo", "demo", &spec);
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.containers.len(), 1);
    assert_eq!(pod.containers[0].name, "agent");
}

#[test]
fn test_agent_container_args_carry_system_prompt() {
    let mut spec = minimal_agent_spec();
    spec.system_prompt = "hello".to_string();
    let deployment = build_agent_deployment("demo", "demo", &spec);
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let args = pod.containers[0].args.clone().unwrap();
    assert_eq!(
        args,
        vec!["--auto-confirm", "--system-prompt", "hello"]
    );
}

#[test]
fn test_agent_container_image_tag_tracks_version() {
    let mut spec = minimal_agent_spec();
    spec.version = Some("v2.1.0".to_string());
    let deployment = build_agent_deployment("demo", "demo", &spec);
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let image = pod.containers[0].image.clone().unwrap();
    assert!(image.ends_with(":v2.1.0"), "image was {image}");
}

#[test]
fn test_agent_container_env_references_api_key_secret() {
    let deployment = build_agent_deployment("demo", "demo", &minimal_agent_spec());
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let env = pod.containers[0].env.clone().unwrap();
    let key_ref = env[0]
        .value_from
        .as_ref()
        .unwrap()
        .secret_key_ref
        .as_ref()
        .unwrap();
    assert_eq!(env[0].name, "ANTHROPIC_API_KEY");
    assert_eq!(key_ref.name, "demo-api-key");
    assert_eq!(key_ref.key, "ANTHROPIC_API_KEY");
}

#[test]
fn test_agent_deployment_volumes_reference_owned_objects() {
    let deployment = build_agent_deployment("demo", "demo", &minimal_agent_spec());
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let volumes = pod.volumes.unwrap();

    let claim_names: Vec<_> = volumes
        .iter()
        .filter_map(|v| v.persistent_volume_claim.as_ref())
        .map(|p| p.claim_name.clone())
        .collect();
    assert!(claim_names.contains(&"demo-data".to_string()));
    assert!(claim_names.contains(&"demo-metadata".to_string()));

    let cm_names: Vec<_> = volumes
        .iter()
        .filter_map(|v| v.config_map.as_ref())
        .map(|c| c.name.clone())
        .collect();
    assert!(cm_names.contains(&"demo-mcp-config".to_string()));
}

#[test]
fn test_agent_mcp_mount_is_a_read_only_sub_path() {
    let deployment = build_agent_deployment("demo", "demo", &minimal_agent_spec());
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let mounts = pod.containers[0].volume_mounts.clone().unwrap();
    let mcp = mounts
        .iter()
        .find(|m| m.mount_path == "/etc/agentry/mcp.json")
        .expect("mcp mount present");
    assert_eq!(mcp.sub_path.as_deref(), Some("mcp.json"));
    assert_eq!(mcp.read_only, Some(true));
}

#[test]
fn test_build_browser_deployment_runs_playwright_server() {
    let deployment = build_browser_deployment("demo", "demo");
    assert_eq!(deployment.metadata.name.as_deref(), Some("demo-browser"));
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let args = pod.containers[0].args.clone().unwrap();
    assert!(args.contains(&"playwright".to_string()));
    assert!(args.contains(&"run-server".to_string()));
}

#[test]
fn test_build_agent_service_targets_code_server_port() {
    let service = build_agent_service("demo", "demo");
    assert_eq!(service.metadata.name.as_deref(), Some("demo"));
    let spec = service.spec.unwrap();
    assert_eq!(
        spec.selector.unwrap().get("app").map(String::as_str),
        Some("demo")
    );
    assert_eq!(spec.ports.unwrap()[0].port, CODE_SERVER_PORT);
}

#[test]
fn test_build_code_ingress_routes_host_to_agent_service() {
    let ingress = build_code_ingress("demo", "demo", "code.example.com");
    assert_eq!(ingress.metadata.name.as_deref(), Some("demo-code"));

    let rules = ingress.spec.unwrap().rules.unwrap();
    assert_eq!(rules[0].host.as_deref(), Some("code.example.com"));

    let path = &rules[0].http.as_ref().unwrap().paths[0];
    assert_eq!(path.path_type, "Prefix");
    let backend = path.backend.service.as_ref().unwrap();
    assert_eq!(backend.name, "demo");
    assert_eq!(backend.port.as_ref().unwrap().number, Some(CODE_SERVER_PORT));
}

#[test]
fn test_build_request_deployment_wires_prompt_and_shared_secret() {
    let spec = LLMRequestSpec {
        prompt: "Summarize the repo".to_string(),
        version: Some("0.3".to_string()),
    };
    let deployment = build_request_deployment("req1", "default", &spec);
    assert_eq!(deployment.metadata.name.as_deref(), Some("req1"));

    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let container = &pod.containers[0];

    let image = container.image.clone().unwrap();
    assert!(image.ends_with(":0.3"), "image was {image}");

    let args = container.args.clone().unwrap();
    assert_eq!(
        args,
        vec!["--auto-confirm", "--initial-user-input", "Summarize the repo"]
    );

    // One-shot runs share a pre-provisioned namespace secret rather than a
    // per-instance one.
    let key_ref = container.env.as_ref().unwrap()[0]
        .value_from
        .as_ref()
        .unwrap()
        .secret_key_ref
        .as_ref()
        .unwrap();
    assert_eq!(key_ref.name, "anthropic-api-key");

    let volumes = pod.volumes.unwrap();
    assert!(volumes[0].host_path.is_some());
}

#[test]
fn test_build_request_nginx_deployment_mounts_config_and_output() {
    let deployment = build_request_nginx_deployment("req1", "default");
    assert_eq!(deployment.metadata.name.as_deref(), Some("req1-nginx"));

    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let mounts = pod.containers[0].volume_mounts.clone().unwrap();

    let conf = mounts
        .iter()
        .find(|m| m.sub_path.as_deref() == Some("nginx.conf"))
        .expect("nginx.conf mount present");
    assert_eq!(conf.mount_path, "/etc/nginx/nginx.conf");

    let output = mounts
        .iter()
        .find(|m| m.mount_path == "/data/output")
        .expect("output mount present");
    assert_eq!(output.read_only, Some(true));

    let volumes = pod.volumes.unwrap();
    let cm = volumes
        .iter()
        .find_map(|v| v.config_map.as_ref())
        .expect("config map volume present");
    assert_eq!(cm.name, "req1-nginx-config");
}

#[test]
fn test_build_request_nginx_service_exposes_http() {
    let service = build_request_nginx_service("req1", "default");
    assert_eq!(service.metadata.name.as_deref(), Some("req1-nginx"));
    let spec = service.spec.unwrap();
    assert_eq!(spec.ports.unwrap()[0].port, NGINX_PORT);
    assert_eq!(
        spec.selector.unwrap().get("app").map(String::as_str),
        Some("req1-nginx")
    );
}
