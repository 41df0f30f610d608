//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client connection
//!     → request.rs (request line, GET only)
//!     → target.rs (absolute-form URI → host, port, path)
//!     → header.rs (drain client headers, build origin request)
//!     → relay.rs (connect, forward, relay response, access log)
//! ```
//!
//! # Design Decisions
//! - Origin side always speaks HTTP/1.0 with `Connection: close`
//! - Responses are relayed line by line without looking at framing
//! - No error responses are synthesized; failures close the connection

pub mod error;
pub mod header;
pub mod relay;
pub mod request;
pub mod target;

pub use error::RelayError;
pub use header::{drain_headers, HeaderRewriter, OutboundRequest, USER_AGENT};
pub use relay::{Relay, RelayOutcome};
pub use request::RequestLine;
pub use target::{Target, UriError};
