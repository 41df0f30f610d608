//! Forwarding HTTP proxy.
//!
//! ```text
//!   browser ──GET http://host:port/path──▶ ┌────────────┐ ──GET /path HTTP/1.0──▶ origin
//!                                          │ dispatcher │
//!   browser ◀──────── response lines ───── │  + relay   │ ◀──── response lines ── origin
//!                                          └─────┬──────┘
//!                                                ▼
//!                                            proxy.log
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use forward_proxy::config::load_config;
use forward_proxy::net::Dispatcher;
use forward_proxy::observability::{logging, metrics, AccessLog};
use forward_proxy::{Relay, Shutdown};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Forwarding proxy for HTTP GET requests", long_about = None)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.port)?;

    logging::init_logging(&config.observability);
    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        access_log = %config.access_log.path,
        max_line_len = config.relay.max_line_len,
        io_timeout_secs = ?config.relay.io_timeout_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        // Validated at load time.
        if let Ok(addr) = addr.parse() {
            metrics::init_metrics(addr);
        }
    }

    let access_log = Arc::new(AccessLog::new(&config.access_log.path));
    let relay = Relay::new(&config.relay, access_log);
    let dispatcher = Dispatcher::bind(&config.listener, relay).await?;

    // Never triggered: the process runs until it is killed.
    let shutdown = Shutdown::new();
    dispatcher.run(shutdown.subscribe()).await;

    Ok(())
}
