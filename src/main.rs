//! SQL Agent MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI agents to
//! explore and query a PostgreSQL database, with a confirmation handshake
//! guarding every mutating statement.

use clap::Parser;
use sql_agent_mcp::config::{Config, TransportMode};
use sql_agent_mcp::db::ConnectionProvider;
use sql_agent_mcp::error::ServerError;
use sql_agent_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Logging is opt-in: stdout/stderr noise breaks stdio transports
    if config.enable_logs {
        init_tracing(&config);
    }

    info!(
        transport = %config.transport,
        "Starting SQL Agent MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // The provider is constructed once here and shared by reference with
    // every component that needs database access.
    let provider = Arc::new(ConnectionProvider::new(config.db_settings()));

    // Validate the connection at startup. Missing configuration is fatal;
    // an unreachable database is not - handle creation is retried on the
    // next access, so the server starts and surfaces errors per call.
    match provider.pool().await {
        Ok(_) => match provider.ping().await {
            Ok(()) => info!("Database connection validated"),
            Err(e) => warn!(error = %e, "Database liveness check failed, will retry per call"),
        },
        Err(e @ ServerError::Configuration { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Required environment variables: DB_HOST, DB_NAME, DB_USER, DB_PASSWORD");
            eprintln!("Optional: DB_PORT (default 5432), DB_CONNECT_TIMEOUT (default 10)");
            std::process::exit(1);
        }
        Err(e) => {
            warn!(error = %e, "Database not reachable at startup, will retry on first call");
        }
    }

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(provider);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                provider,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
