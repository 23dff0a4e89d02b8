//! `listen`: runs the webhook trigger.
//!
//! Registers the subscription (unless a hook id is already stored), serves
//! `POST /webhook` until shutdown, prints each accepted delivery as one JSON
//! line, then removes the subscription.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use airparser_core::AirparserService;
use airparser_core::webhook::{
    DeliveryHandler, DeliveryOutcome, FileStore, MemoryStore, StaticDataStore, TriggerEvent,
    WEBHOOK_SECRET_HEADER, WebhookLifecycle, WebhookRegistration, WorkflowItem,
};
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use clap::Args;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::write_json_line;
use crate::config::{ServerConfig, WEBHOOK_PATH};
use crate::{TRACING_TARGET_COMMAND, server};

/// Arguments of `listen`.
#[derive(Debug, Clone, Args)]
pub struct ListenArgs {
    /// Inbox whose events are delivered.
    #[arg(long, env = "AIRPARSER_INBOX")]
    pub inbox: String,

    /// Event to subscribe to.
    #[arg(long, default_value = "doc.parsed")]
    pub event: TriggerEvent,

    /// Listener configuration.
    #[command(flatten)]
    pub server: ServerConfig,
}

/// Shared state of the webhook route.
#[derive(Debug, Clone)]
pub(crate) struct ListenState {
    handler: DeliveryHandler,
    items: mpsc::UnboundedSender<WorkflowItem>,
}

impl ListenState {
    pub(crate) fn new(handler: DeliveryHandler, items: mpsc::UnboundedSender<WorkflowItem>) -> Self {
        Self { handler, items }
    }
}

/// Runs the trigger until a shutdown signal, writing items to `out`.
pub async fn run<W>(service: AirparserService, args: ListenArgs, out: W) -> anyhow::Result<()>
where
    W: Write + Send + 'static,
{
    let webhook_url = args.server.effective_webhook_url()?;
    let store: Arc<dyn StaticDataStore> = match &args.server.state_file {
        Some(path) => Arc::new(FileStore::new(path.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    let registration = WebhookRegistration::new(args.inbox.clone(), webhook_url).with_event(args.event);
    let lifecycle = WebhookLifecycle::new(service, store, registration);
    ensure_subscribed(&lifecycle).await?;

    let (items, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_items(rx, out));

    let handler = DeliveryHandler::new(args.server.webhook_secret.clone());
    let app = router(ListenState::new(handler, items));
    let served = server::serve(app, &args.server).await;

    unsubscribe(&lifecycle, args.server.shutdown_timeout()).await;

    printer.await.context("output task failed")??;

    served.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %err,
            hint = err.hint(),
            "Listener failed"
        );
        anyhow::Error::from(err)
    })
}

/// Builds the webhook route.
pub(crate) fn router(state: ListenState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(receive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Registers the subscription unless a hook id is already stored.
async fn ensure_subscribed<S: StaticDataStore>(lifecycle: &WebhookLifecycle<S>) -> anyhow::Result<()> {
    if lifecycle.check_exists().await? {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            "Reusing stored webhook subscription"
        );
        return Ok(());
    }

    if !lifecycle.create().await? {
        anyhow::bail!("Airparser rejected the webhook subscription");
    }

    Ok(())
}

/// Removes the subscription, giving up after `timeout`.
async fn unsubscribe<S: StaticDataStore>(lifecycle: &WebhookLifecycle<S>, timeout: Duration) {
    match tokio::time::timeout(timeout, lifecycle.delete()).await {
        Ok(Ok(_)) => {}
        Ok(Err(error)) => {
            tracing::warn!(
                target: TRACING_TARGET_COMMAND,
                error = %error,
                "Failed to clear stored webhook subscription"
            );
        }
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_COMMAND,
                timeout_secs = timeout.as_secs(),
                "Timed out removing webhook subscription"
            );
        }
    }
}

/// Writes every item to `out` until all senders are gone.
async fn print_items<W: Write>(
    mut rx: mpsc::UnboundedReceiver<WorkflowItem>,
    mut out: W,
) -> anyhow::Result<()> {
    while let Some(item) = rx.recv().await {
        write_json_line(&mut out, &item.json)?;
    }
    Ok(())
}

async fn receive(
    State(state): State<ListenState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        match serde_json::from_slice(&body) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_COMMAND,
                    error = %error,
                    "Rejected webhook delivery with invalid JSON"
                );
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid JSON body" })),
                );
            }
        }
    };

    let secret = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = state.handler.handle(secret, body);
    let response = Json(outcome.response_body());

    match outcome {
        DeliveryOutcome::Accepted(items) => {
            for item in items {
                if state.items.send(item).is_err() {
                    tracing::warn!(
                        target: TRACING_TARGET_COMMAND,
                        "Output closed, dropping webhook delivery"
                    );
                }
            }
            (StatusCode::OK, response)
        }
        DeliveryOutcome::Rejected { .. } => (StatusCode::UNAUTHORIZED, response),
    }
}
