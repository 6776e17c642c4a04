//! autotask-search-mcp - MCP server for Autotask ticket search
//!
//! This binary runs as an MCP server using stdio transport, letting an
//! LLM client search Autotask tickets through the ticket search API.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `AUTOTASK_API_KEY`: Bearer token for the search API (required)
//! - `AUTOTASK_API_BASE_URL`: Base URL of the search API (default `http://localhost:8000`)
//! - `AUTOTASK_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
//!
//! # Usage
//!
//! ```bash
//! AUTOTASK_API_KEY=xxx ./autotask-search-mcp
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use autotask_search_mcp::{backend_client, config, server};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries MCP JSON-RPC; logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autotask_search_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "Starting autotask-search-mcp v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = config::Config::from_env()
        .inspect_err(|e| tracing::error!(code = e.code(), error = %e, "Invalid configuration"))
        .context("Failed to load configuration")?;

    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "Configuration loaded");

    let client = backend_client::BackendClient::new(&config)
        .context("Failed to create search API client")?;

    let server = server::AutotaskSearchServer::new(client);

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
