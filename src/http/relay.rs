//! Per-connection transaction.
//!
//! ```text
//! ReadRequestLine → ParseTarget → BuildHeader → Connect → Forward → Relay → Finalize
//! ```
//!
//! Every step may abort; an abort closes the client connection without
//! writing anything to it. The response is copied one line at a time and
//! never interpreted, so binary bodies survive only as long as the line
//! chunking does not matter to the client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::error::RelayError;
use crate::http::header::drain_headers;
use crate::http::request::RequestLine;
use crate::http::target::Target;
use crate::net::connection::ConnectionId;
use crate::net::origin::OriginConnector;
use crate::net::reader::LineReader;
use crate::observability::access_log::{AccessLog, TransactionRecord};
use crate::observability::metrics;

/// Result of a transaction that reached the relay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    pub bytes_relayed: u64,
}

/// Shared by every transaction task.
#[derive(Debug)]
pub struct Relay {
    connector: OriginConnector,
    access_log: Arc<AccessLog>,
    max_line_len: usize,
    io_timeout: Option<Duration>,
}

impl Relay {
    pub fn new(config: &RelayConfig, access_log: Arc<AccessLog>) -> Self {
        Self {
            connector: OriginConnector::new(config.io_timeout()),
            access_log,
            max_line_len: config.max_line_len,
            io_timeout: config.io_timeout(),
        }
    }

    /// Run one transaction to completion. Errors stay inside the task.
    pub async fn serve<S>(&self, client: S, peer_addr: SocketAddr, id: ConnectionId)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let span = tracing::info_span!("transaction", connection_id = %id, peer_addr = %peer_addr);
        let result = self
            .transact(client, &peer_addr.ip().to_string())
            .instrument(span.clone())
            .await;

        let _enter = span.enter();
        match result {
            Ok(outcome) => {
                metrics::record_transaction("completed");
                tracing::debug!(bytes = outcome.bytes_relayed, "Transaction finished");
            }
            Err(e) => {
                metrics::record_transaction(e.label());
                if matches!(e, RelayError::EmptyRequest) {
                    tracing::debug!("Client closed without a request");
                } else if e.is_protocol() {
                    tracing::info!(error = %e, "Request dropped");
                } else {
                    tracing::warn!(error = %e, "Transaction aborted");
                }
            }
        }
    }

    /// Drive the state machine for one client connection.
    ///
    /// `client_host` is what the access log records for this client.
    pub async fn transact<S>(&self, client: S, client_host: &str) -> Result<RelayOutcome, RelayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (client_rd, mut client_wr) = tokio::io::split(client);
        let mut client_reader =
            LineReader::new(client_rd, self.max_line_len).with_timeout(self.io_timeout);

        // ReadRequestLine
        let mut line = Vec::new();
        match client_reader.read_line(&mut line).await {
            Ok(0) => return Err(RelayError::EmptyRequest),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Reading request line failed");
                return Err(RelayError::EmptyRequest);
            }
        }
        if client_reader.is_partial(&line) {
            return Err(RelayError::RequestLineTooLong {
                limit: self.max_line_len,
            });
        }
        let request = RequestLine::parse(&String::from_utf8_lossy(&line))?;
        tracing::debug!(uri = %request.uri, version = ?request.version, "Request line");

        // ParseTarget, then BuildHeader. Headers are drained even when the
        // URI is bad so the client stream stays in step.
        let target = Target::parse(&request.uri);
        let headers = drain_headers(&mut client_reader).await?;
        let target = target?;
        let outbound = headers.finish(&target);

        // Connect
        let origin = self
            .connector
            .connect(&target)
            .await
            .map_err(|source| RelayError::Connect {
                target: target.to_string(),
                source,
            })?;

        let bytes_relayed = {
            let (origin_rd, mut origin_wr) = origin.into_split();

            // Forward
            origin_wr.write_all(&outbound.to_bytes()).await?;
            tracing::debug!(origin = %target, request_line = %outbound.request_line().trim_end(), "Request forwarded");

            // Relay
            let mut origin_reader =
                LineReader::new(origin_rd, self.max_line_len).with_timeout(self.io_timeout);
            relay_lines(&mut origin_reader, &mut client_wr).await
            // Finalize: both origin halves drop here, closing the connection.
        };

        metrics::record_bytes_relayed(bytes_relayed);

        if bytes_relayed > 0 {
            let record = TransactionRecord {
                timestamp: Local::now(),
                client_host: client_host.to_string(),
                url: request.uri.clone(),
                byte_count: bytes_relayed,
            };
            if let Err(e) = self.access_log.append(&record).await {
                tracing::warn!(error = %e, "Access log write failed");
            }
        }

        let _ = client_wr.shutdown().await;
        Ok(RelayOutcome { bytes_relayed })
    }
}

/// Copy lines from the origin to the client until EOF or the first error.
///
/// Returns the number of bytes the client accepted.
async fn relay_lines<R, W>(origin: &mut LineReader<R>, client: &mut W) -> u64
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut total = 0u64;
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = match origin.read_line(&mut line).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "Origin read failed");
                break;
            }
        };
        if let Err(e) = client.write_all(&line).await {
            tracing::debug!(error = %e, "Client write failed");
            break;
        }
        total += n as u64;
    }
    total
}
