//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest line handed out by the line reader in one piece.
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Where completed transactions are recorded.
    pub access_log: AccessLogConfig,

    /// Per-transaction I/O settings.
    pub relay: RelayConfig,

    /// Diagnostics and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface address to bind (all interfaces by default).
    pub host: String,

    /// TCP port. Always overridden by the command line argument.
    pub port: u16,
}

impl ListenerConfig {
    /// Socket address to bind; IPv6 hosts are bracketed when displayed.
    pub fn bind_address(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
        }
    }
}

/// Access log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessLogConfig {
    /// File that transaction records are appended to.
    pub path: String,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            path: "proxy.log".to_string(),
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Maximum bytes returned by one line read; longer lines arrive in chunks.
    pub max_line_len: usize,

    /// Deadline for each read and for the origin connect, in seconds.
    /// Unset means block for as long as the peer does.
    pub io_timeout_secs: Option<u64>,
}

impl RelayConfig {
    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            io_timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus exporter bind address; metrics are discarded when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
