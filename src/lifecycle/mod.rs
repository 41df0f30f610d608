//! Lifecycle management.
//!
//! The shipped binary runs until it is killed. `Shutdown` is the hook a
//! caller uses to stop the dispatcher's accept loop; in-flight
//! transactions are left to finish on their own.

pub mod shutdown;

pub use shutdown::Shutdown;
