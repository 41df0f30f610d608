//! Connection dispatcher.
//!
//! # Responsibilities
//! - Bind the listening port on the configured interface
//! - Accept incoming TCP connections
//! - Spawn one independent transaction task per connection
//! - Log accept errors and keep going

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ListenerConfig;
use crate::http::relay::Relay;
use crate::net::connection::ConnectionTracker;
use crate::observability::metrics;

/// Pause after a failed accept so descriptor exhaustion does not spin.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(#[source] std::io::Error),
}

pub struct Dispatcher {
    inner: TcpListener,
    relay: Arc<Relay>,
    tracker: ConnectionTracker,
}

impl Dispatcher {
    /// Bind the listening socket. Failure here is fatal at startup.
    pub async fn bind(config: &ListenerConfig, relay: Relay) -> Result<Self, ListenerError> {
        let addr = config.bind_address().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        Ok(Self::from_listener(listener, relay))
    }

    /// Wrap an already bound listener.
    pub fn from_listener(listener: TcpListener, relay: Relay) -> Self {
        if let Ok(local_addr) = listener.local_addr() {
            tracing::info!(address = %local_addr, "Listener bound");
        }
        Self {
            inner: listener,
            relay: Arc::new(relay),
            tracker: ConnectionTracker::new(),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Handle on the in-flight transaction count.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept connections until `shutdown` fires or its sender is dropped.
    ///
    /// Stopping only ends the accept loop; spawned transactions keep
    /// running until their connections close.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            let accepted = tokio::select! {
                accepted = self.inner.accept() => accepted,
                _ = shutdown.recv() => {
                    tracing::info!(
                        in_flight = self.tracker.active_count(),
                        "Dispatcher stopped accepting"
                    );
                    return;
                }
            };

            let (stream, peer_addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            };

            let guard = self.tracker.track();
            tracing::info!(
                connection_id = %guard.id(),
                peer_addr = %peer_addr,
                "Accepted connection"
            );
            metrics::record_accept();

            let relay = Arc::clone(&self.relay);
            tokio::spawn(async move {
                relay.serve(stream, peer_addr, guard.id()).await;
                drop(guard);
            });
        }
    }
}
