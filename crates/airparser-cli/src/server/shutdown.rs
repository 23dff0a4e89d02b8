//! Process signals that stop the listener.

use std::future::{Future, pending};

use crate::TRACING_TARGET_SHUTDOWN;

/// The signal that ended [`wait_for_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    /// Conventional unix name.
    const fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

/// Resolves on the first Ctrl+C or, on unix, SIGTERM.
///
/// A handler that cannot be installed is logged and never fires, so the
/// other one still works.
async fn wait_for_signal() -> Signal {
    tokio::select! {
        () = interrupt() => Signal::Interrupt,
        () = terminate() => Signal::Terminate,
    }
}

/// [`wait_for_signal`] shaped for `axum::serve(..).with_graceful_shutdown`.
pub(crate) fn on_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        let signal = wait_for_signal().await;
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            signal = signal.name(),
            "Stopping listener"
        );
    }
}

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        handler_failed("SIGINT", &error);
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            handler_failed("SIGTERM", &error);
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}

fn handler_failed(signal: &str, error: &std::io::Error) {
    tracing::warn!(
        target: TRACING_TARGET_SHUTDOWN,
        signal,
        error = %error,
        "Signal handler unavailable"
    );
}
