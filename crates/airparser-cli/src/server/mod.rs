//! Runs the webhook router on a TCP socket until the process is signalled.

mod error;
mod shutdown;

use std::future::{Future, IntoFuture, pending};
use std::time::Duration;

use axum::Router;
pub use error::{ListenerError, ListenerResult};
use shutdown::on_signal;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Serves `app` on the configured address until SIGINT or SIGTERM.
///
/// Open deliveries get the configured shutdown timeout to finish.
pub async fn serve(app: Router, config: &ServerConfig) -> ListenerResult<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            %addr,
            "Webhook endpoint is reachable from every interface"
        );
    }
    tracing::info!(target: TRACING_TARGET_STARTUP, %addr, "Waiting for deliveries");

    serve_until(listener, app, on_signal(), config.shutdown_timeout()).await
}

/// Serves until `stop` resolves, then waits at most `drain` for open
/// connections before returning.
async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    stop: F,
    drain: Duration,
) -> ListenerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stopped_tx, stopped_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        stop.await;
        let _ = stopped_tx.send(());
    });

    let deadline = async move {
        match stopped_rx.await {
            Ok(()) => tokio::time::sleep(drain).await,
            Err(_) => pending().await,
        }
    };

    tokio::select! {
        served = server.into_future() => served.map_err(ListenerError::Serve)?,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                drain_secs = drain.as_secs_f64(),
                "Dropping deliveries still open after shutdown timeout"
            );
        }
    }

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Listener stopped");
    Ok(())
}
