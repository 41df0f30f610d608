//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (port, optional --config)
//!     → loader.rs (read TOML file, or defaults)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → pieces handed to dispatcher, relay and access log
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload
//! - All fields have defaults so the file is optional
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AccessLogConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RelayConfig};
