// Copyright (c) 2025 Agentry Contributors
// SPDX-License-Identifier: MIT

use agentry::{
    constants::{
        ERROR_REQUEUE_DURATION_SECS, KIND_AGENT, KIND_LLM_REQUEST, READY_REQUEUE_DURATION_SECS,
        TOKIO_WORKER_THREADS,
    },
    crd::{Agent, LLMRequest},
    credentials::Credentials,
    metrics::{record_reconciliation_error, record_reconciliation_success, serve_metrics},
    reconcilers::{reconcile_agent, reconcile_llmrequest},
};
use anyhow::Result;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] anyhow::Error);

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("agentry-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug cargo run
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json cargo run
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Agentry operator");

    // Credentials come from the operator's own environment, never from the
    // resources being reconciled.
    let credentials = Credentials::from_env()?;

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    tokio::spawn(async {
        if let Err(e) = serve_metrics().await {
            error!("Metrics server exited: {}", e);
        }
    });

    info!("Starting all controllers");

    // Controllers should never exit - if one does, log it and exit the main process
    tokio::select! {
        result = run_agent_controller(client.clone(), credentials.clone()) => {
            error!("CRITICAL: Agent controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Agent controller exited unexpectedly without error")
        }
        result = run_llmrequest_controller(client.clone()) => {
            error!("CRITICAL: LLMRequest controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("LLMRequest controller exited unexpectedly without error")
        }
    }
}

/// Run the `Agent` controller
async fn run_agent_controller(client: Client, credentials: Credentials) -> Result<()> {
    info!("Starting Agent controller");

    let api = Api::<Agent>::all(client.clone());

    Controller::new(api, Config::default())
        .run(
            reconcile_agent_wrapper,
            error_policy_agent,
            Arc::new((client, credentials)),
        )
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Run the `LLMRequest` controller
async fn run_llmrequest_controller(client: Client) -> Result<()> {
    info!("Starting LLMRequest controller");

    let api = Api::<LLMRequest>::all(client.clone());

    Controller::new(api, Config::default())
        .run(
            reconcile_llmrequest_wrapper,
            error_policy_llmrequest,
            Arc::new(client),
        )
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Reconcile wrapper for `Agent`
async fn reconcile_agent_wrapper(
    agent: Arc<Agent>,
    ctx: Arc<(Client, Credentials)>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    match reconcile_agent(ctx.0.clone(), (*agent).clone(), &ctx.1).await {
        Ok(()) => {
            info!("Successfully reconciled Agent: {}", agent.name_any());
            record_reconciliation_success(KIND_AGENT, start.elapsed());

            // Check if the agent is ready to determine requeue interval
            let is_ready = agent
                .status
                .as_ref()
                .and_then(|status| status.conditions.first())
                .is_some_and(|condition| condition.r#type == "Ready" && condition.status == "True");

            if is_ready {
                Ok(Action::requeue(Duration::from_secs(
                    READY_REQUEUE_DURATION_SECS,
                )))
            } else {
                Ok(Action::requeue(Duration::from_secs(
                    ERROR_REQUEUE_DURATION_SECS,
                )))
            }
        }
        Err(e) => {
            error!("Failed to reconcile Agent: {}", e);
            record_reconciliation_error(KIND_AGENT, start.elapsed());
            Err(e.into())
        }
    }
}

/// Reconcile wrapper for `LLMRequest`
async fn reconcile_llmrequest_wrapper(
    request: Arc<LLMRequest>,
    ctx: Arc<Client>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    match reconcile_llmrequest((*ctx).clone(), (*request).clone()).await {
        Ok(()) => {
            info!("Successfully reconciled LLMRequest: {}", request.name_any());
            record_reconciliation_success(KIND_LLM_REQUEST, start.elapsed());

            let is_ready = request
                .status
                .as_ref()
                .and_then(|status| status.conditions.first())
                .is_some_and(|condition| condition.r#type == "Ready" && condition.status == "True");

            if is_ready {
                Ok(Action::requeue(Duration::from_secs(
                    READY_REQUEUE_DURATION_SECS,
                )))
            } else {
                Ok(Action::requeue(Duration::from_secs(
                    ERROR_REQUEUE_DURATION_SECS,
                )))
            }
        }
        Err(e) => {
            error!("Failed to reconcile LLMRequest: {}", e);
            record_reconciliation_error(KIND_LLM_REQUEST, start.elapsed());
            Err(e.into())
        }
    }
}

fn error_policy_agent(
    _agent: Arc<Agent>,
    error: &ReconcileError,
    _ctx: Arc<(Client, Credentials)>,
) -> Action {
    error!("Agent reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

fn error_policy_llmrequest(
    _request: Arc<LLMRequest>,
    error: &ReconcileError,
    _ctx: Arc<Client>,
) -> Action {
    error!("LLMRequest reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}
