//! MCP server implementation.
//!
//! This module defines the `AutotaskSearchServer` struct that implements
//! the MCP `ServerHandler` trait, exposing the ticket search API as four
//! read-only tools.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};

use crate::backend_client::BackendClient;
use crate::error::GatewayError;
use crate::tools::{
    handlers, GetRelatedTicketsInput, GetTicketDetailsInput, GetTicketsNotesInput,
    SearchTicketsInput,
};

/// The ticket search MCP server.
#[derive(Clone)]
pub struct AutotaskSearchServer {
    /// Client for the search API.
    client: BackendClient,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AutotaskSearchServer {
    /// Creates a new server instance.
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Free-text ticket search.
    #[tool(description = "Search Autotask tickets by keywords, company names or a rough description of the problem. Combines keyword and semantic ranking, so partial names and misspellings work. Optional filters: start_date/end_date (YYYY-MM-DD), sentiment (negative, neutral, positive), min_frustration (0.0-1.0) and priority_only. Returns ticket number, id, relevance, title, snippet and creation time.")]
    async fn search_tickets(
        &self,
        Parameters(input): Parameters<SearchTicketsInput>,
    ) -> Result<String, String> {
        handlers::search_tickets(&self.client, input)
            .await
            .map_err(|e| self.tool_error("search_tickets", &e))
    }

    /// Full ticket with human notes.
    #[tool(description = "Get the full details of one ticket by its numeric task_id (from search results), including the complete description and all human-written notes in chronological order. System-generated notes are excluded.")]
    async fn get_ticket_details(
        &self,
        Parameters(input): Parameters<GetTicketDetailsInput>,
    ) -> Result<String, String> {
        handlers::get_ticket_details(&self.client, input)
            .await
            .map_err(|e| self.tool_error("get_ticket_details", &e))
    }

    /// Similar tickets.
    #[tool(description = "Find tickets similar to a given ticket (by numeric task_id). Useful for spotting recurring issues. limit defaults to 10, max 30.")]
    async fn get_related_tickets(
        &self,
        Parameters(input): Parameters<GetRelatedTicketsInput>,
    ) -> Result<String, String> {
        handlers::get_related_tickets(&self.client, input)
            .await
            .map_err(|e| self.tool_error("get_related_tickets", &e))
    }

    /// Bulk notes.
    #[tool(description = "Get the human-written notes of up to 50 tickets in one call. Pass task_ids (numeric), task_numbers (e.g. \"T20240101.0001\") or both. Notes are grouped per requested ticket in chronological order; tickets the search service does not know are flagged.")]
    async fn get_tickets_notes(
        &self,
        Parameters(input): Parameters<GetTicketsNotesInput>,
    ) -> Result<String, String> {
        handlers::get_tickets_notes(&self.client, input)
            .await
            .map_err(|e| self.tool_error("get_tickets_notes", &e))
    }

    /// Logs a failed tool call and renders it for the caller, with the API
    /// key scrubbed from both.
    fn tool_error(&self, tool: &str, error: &GatewayError) -> String {
        let message = GatewayError::sanitize_message(
            &error.to_tool_message(),
            self.client.api_key_for_sanitization(),
        );
        tracing::error!(tool, code = error.code(), error = %message, "Tool call failed");
        message
    }
}

#[tool_handler]
impl ServerHandler for AutotaskSearchServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search Autotask tickets. Start with search_tickets to find tickets by \
                 keywords or company names, then use get_ticket_details with a task_id for \
                 the full description and notes. Use get_related_tickets to find similar \
                 issues and get_tickets_notes to read notes from many tickets at once."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
