//! Forwarding HTTP proxy library.
//!
//! Accepts HTTP/1.x GET requests in absolute form, forwards them to the
//! named origin server as HTTP/1.0 and relays the response back line by
//! line, appending one access log record per completed transaction.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ProxyConfig;
pub use http::Relay;
pub use lifecycle::Shutdown;
pub use net::Dispatcher;
