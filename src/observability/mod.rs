//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every transaction produces:
//!     → logging.rs (diagnostic events on stderr)
//!     → metrics.rs (counters, optional Prometheus endpoint)
//!     → access_log.rs (one line per completed transaction)
//! ```
//!
//! # Design Decisions
//! - The access log is the only state shared between transactions
//! - It is passed around explicitly as `Arc<AccessLog>`, never global
//! - Diagnostics are for humans; the access log format is stable

pub mod access_log;
pub mod logging;
pub mod metrics;

pub use access_log::{AccessLog, AccessLogError, TransactionRecord};
