//! Hanoi MCP Server Binary
//!
//! Serves one Tower of Hanoi puzzle over MCP with stdio transport.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hanoi-mcp
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log level filter (e.g., `info`, `debug`, `hanoi=debug`)
//! - `HANOI_DISKS` - Number of disks (default: 3)

use hanoi::mcp::HanoiServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DISKS: u32 = 3;

fn disks_from_env() -> Result<u32, String> {
    match std::env::var("HANOI_DISKS") {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("HANOI_DISKS must be a positive integer: {}", e)),
        Err(_) => Ok(DEFAULT_DISKS),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hanoi=debug")),
        )
        .init();

    let n_disks = disks_from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        disks = n_disks,
        "Starting Hanoi MCP server"
    );

    let server = HanoiServer::new(n_disks).inspect_err(|e| {
        error!(error = %e, "Invalid puzzle configuration");
    })?;

    let shutdown = async {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C, shutting down");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down");
            }
        }
    };

    info!("Listening on stdio transport");

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!(error = %e, "Failed to start MCP server");
    })?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP service completed"),
                Err(e) => warn!(error = %e, "MCP service error"),
            }
        }
        _ = shutdown => {
            info!("Graceful shutdown complete");
        }
    }

    info!("Hanoi MCP server stopped");
    Ok(())
}
