//! Outbound connections to origin servers.
//!
//! One fresh connection per transaction: no pooling, no retry.

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::http::target::Target;

#[derive(Debug, Clone, Default)]
pub struct OriginConnector {
    timeout: Option<Duration>,
}

impl OriginConnector {
    /// `timeout` bounds name resolution plus the TCP handshake; `None`
    /// leaves it to the operating system.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub async fn connect(&self, target: &Target) -> io::Result<TcpStream> {
        let addr = (target.hostname.as_str(), target.port);
        let stream = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, TcpStream::connect(addr))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "origin connect timed out"))??,
            None => TcpStream::connect(addr).await?,
        };

        tracing::debug!(
            origin = %target,
            local_addr = ?stream.local_addr().ok(),
            "Connected to origin"
        );
        Ok(stream)
    }
}
