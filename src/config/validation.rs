//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Runs before the
//! config is accepted into the system.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.host {0:?} is not an IP address")]
    ListenerHost(String),

    #[error("access_log.path must not be empty")]
    EmptyLogPath,

    #[error("relay.max_line_len must be at least 2, got {0}")]
    MaxLineLen(usize),

    #[error("relay.io_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::ListenerHost(config.listener.host.clone()));
    }
    if config.access_log.path.trim().is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    }
    // Must hold at least the "\r\n" that ends a header block.
    if config.relay.max_line_len < 2 {
        errors.push(ValidationError::MaxLineLen(config.relay.max_line_len));
    }
    if config.relay.io_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.host = "localhost".into();
        config.access_log.path = "  ".into();
        config.relay.max_line_len = 0;
        config.relay.io_timeout_secs = Some(0);
        config.observability.metrics_address = Some("nope".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ListenerHost("localhost".into()),
                ValidationError::EmptyLogPath,
                ValidationError::MaxLineLen(0),
                ValidationError::ZeroTimeout,
                ValidationError::MetricsAddress("nope".into()),
            ]
        );
    }
}
