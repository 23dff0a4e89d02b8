//! Errors raised while running the webhook listener.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for listener operations.
pub type ListenerResult<T> = std::result::Result<T, ListenerError>;

/// Why the webhook listener stopped.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The socket could not be opened.
    #[error("cannot listen on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The accept loop failed after startup.
    #[error("webhook listener failed")]
    Serve(#[source] io::Error),
}

impl ListenerError {
    fn io(&self) -> &io::Error {
        match self {
            Self::Bind { source, .. } | Self::Serve(source) => source,
        }
    }

    /// A hint for the operator, when the cause is a common setup mistake.
    pub fn hint(&self) -> Option<&'static str> {
        let Self::Bind { addr, .. } = self else {
            return None;
        };

        Some(match self.io().kind() {
            io::ErrorKind::AddrInUse => "another process owns this port; pass --port or stop it",
            io::ErrorKind::PermissionDenied if addr.port() < 1024 => {
                "ports below 1024 need elevated privileges"
            }
            io::ErrorKind::PermissionDenied => "the process may not open sockets here",
            io::ErrorKind::AddrNotAvailable => "--host is not an address of this machine",
            _ => return None,
        })
    }
}
