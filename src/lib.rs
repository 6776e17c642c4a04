//! # autotask-search-mcp
//!
//! An MCP (Model Context Protocol) server that lets LLM clients search
//! Autotask tickets through a ticket search API.
//!
//! ## Overview
//!
//! The server exposes four read-only tools:
//!
//! - `search_tickets`: free-text search with combined keyword and semantic ranking
//! - `get_ticket_details`: one ticket with its human-written notes
//! - `get_related_tickets`: tickets similar to a given one
//! - `get_tickets_notes`: notes for up to 50 tickets in a single round trip
//!
//! Every failure reaches the caller as `Error [CODE]: message`, where
//! `CODE` is one of the stable codes in [`error::codes`].
//!
//! ## Configuration
//!
//! - `AUTOTASK_API_KEY`: Bearer token for the search API (required)
//! - `AUTOTASK_API_BASE_URL`: Base URL of the search API (default `http://localhost:8000`)
//! - `AUTOTASK_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
//! - `RUST_LOG`: Log level (e.g., `autotask_search_mcp=debug`)
//!
//! ## Security Considerations
//!
//! The API key is stored only in memory and is:
//! - Never logged at any log level
//! - Sanitized from all error messages
//! - Not included in any tool responses
//!
//! ## Example
//!
//! Using the [`BackendClient`](backend_client::BackendClient) directly:
//!
//! ```ignore
//! use autotask_search_mcp::backend_client::{BackendClient, SearchParams};
//! use autotask_search_mcp::config::Config;
//!
//! async fn example() -> Result<(), autotask_search_mcp::error::GatewayError> {
//!     let config = Config::from_env()?;
//!     let client = BackendClient::new(&config)?;
//!
//!     let params = SearchParams::new("vpn disconnects").with_limit(5);
//!     let response = client.search(&params).await?;
//!     for hit in response.results {
//!         println!("{:?} {:?}", hit.task_number, hit.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod backend_client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod server;
pub mod tools;
