//! Errors that end a single transaction.

use std::io;

use thiserror::Error;

use crate::http::target::UriError;

/// Why a transaction was aborted.
///
/// None of these reach the client as an HTTP status; the connection is
/// simply closed.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client closed (or failed) before sending a request line.
    #[error("client sent no request")]
    EmptyRequest,

    /// Request line without a method or URI.
    #[error("malformed request line {0:?}")]
    MalformedRequestLine(String),

    /// Request line did not fit in one line read.
    #[error("request line longer than {limit} bytes")]
    RequestLineTooLong { limit: usize },

    /// Anything other than GET.
    #[error("method {0} is not implemented")]
    UnsupportedMethod(String),

    #[error("invalid request URI: {0}")]
    InvalidUri(#[from] UriError),

    /// Origin unreachable: refused, unresolvable or timed out.
    #[error("failed to connect to origin {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Client or origin I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RelayError {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RelayError::EmptyRequest => "empty_request",
            RelayError::MalformedRequestLine(_) | RelayError::RequestLineTooLong { .. } => {
                "malformed_request"
            }
            RelayError::UnsupportedMethod(_) => "unsupported_method",
            RelayError::InvalidUri(_) => "invalid_uri",
            RelayError::Connect { .. } => "connect_failed",
            RelayError::Io(_) => "io_error",
        }
    }

    /// Protocol errors and empty requests are expected noise.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            RelayError::EmptyRequest
                | RelayError::MalformedRequestLine(_)
                | RelayError::RequestLineTooLong { .. }
                | RelayError::UnsupportedMethod(_)
                | RelayError::InvalidUri(_)
        )
    }
}
