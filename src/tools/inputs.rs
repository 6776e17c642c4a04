//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! All input structs implement `sanitize()` which trims whitespace
//! from string fields and turns blank optional strings into `None`.
//! This should be called before validation.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Input parameters for the search_tickets tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchTicketsInput {
    /// Search query. Partial company names, keywords and vague or misspelled
    /// descriptions all work.
    pub query: String,

    /// Maximum number of results to return (default: 10, max: 100).
    #[serde(default)]
    pub limit: Option<i64>,

    /// Only tickets created on or after this date (YYYY-MM-DD).
    #[serde(default)]
    pub start_date: Option<String>,

    /// Only tickets created on or before this date (YYYY-MM-DD).
    #[serde(default)]
    pub end_date: Option<String>,

    /// Sentiment filter: "negative", "neutral" or "positive".
    #[serde(default)]
    pub sentiment: Option<String>,

    /// Minimum frustration score (0.0 to 1.0).
    #[serde(default)]
    pub min_frustration: Option<f64>,

    /// If true, only tickets flagged as priority (high negative sentiment
    /// and high frustration).
    #[serde(default)]
    pub priority_only: Option<bool>,
}

impl SearchTicketsInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            query: self.query.trim().to_string(),
            limit: self.limit,
            start_date: trim_option(&self.start_date),
            end_date: trim_option(&self.end_date),
            sentiment: trim_option(&self.sentiment),
            min_frustration: self.min_frustration,
            priority_only: self.priority_only,
        }
    }
}

/// Input parameters for the get_ticket_details tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTicketDetailsInput {
    /// The numeric task id (from search results).
    pub task_id: i64,
}

/// Input parameters for the get_related_tickets tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRelatedTicketsInput {
    /// The numeric task id of the ticket to find similar tickets for.
    pub task_id: i64,

    /// Maximum number of related tickets to return (default: 10, max: 30).
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Input parameters for the get_tickets_notes tool.
///
/// At least one of the two lists must be provided and non-empty.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTicketsNotesInput {
    /// Task ids, e.g. [12345, 67890].
    #[serde(default)]
    pub task_ids: Option<Vec<i64>>,

    /// Ticket numbers, e.g. ["T20240101.0001", "T20240102.0005"].
    #[serde(default)]
    pub task_numbers: Option<Vec<String>>,
}

impl GetTicketsNotesInput {
    /// Sanitizes input by trimming whitespace from every ticket number.
    ///
    /// Blank numbers are kept (as empty strings) so validation can reject
    /// them instead of silently shrinking the request.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            task_ids: self.task_ids,
            task_numbers: self
                .task_numbers
                .map(|numbers| numbers.iter().map(|n| n.trim().to_string()).collect()),
        }
    }
}
