//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, one task per connection)
//!     → connection.rs (id + in-flight tracking)
//!     → http::relay (per-transaction state machine)
//!         → reader.rs (bounded line reads from client and origin)
//!         → origin.rs (outbound connect to the origin server)
//! ```
//!
//! # Design Decisions
//! - Unbounded fan-out: no accept-side connection limit
//! - Each connection tracked so a caller can wait for drain
//! - Accept errors are logged and never stop the loop

pub mod connection;
pub mod listener;
pub mod origin;
pub mod reader;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Dispatcher, ListenerError};
pub use origin::OriginConnector;
pub use reader::LineReader;
