//! Tool operations, independent of the MCP transport.
//!
//! Each handler validates its input, makes exactly one backend call and
//! renders the outcome. Validation failures return before any request is
//! sent.

use crate::aggregate::{aggregate, merge_identifiers};
use crate::backend_client::{BackendClient, SearchParams};
use crate::error::{codes, GatewayError};
use crate::format;
use crate::models::{BulkNotesRequest, SearchFilters};

use super::validation::{
    optional_choice, optional_date, optional_unit_interval, ordered_dates, require_positive_id,
    require_text, RELATED_LIMIT, SEARCH_LIMIT,
};
use super::{GetRelatedTicketsInput, GetTicketDetailsInput, GetTicketsNotesInput, SearchTicketsInput};

const SENTIMENTS: [&str; 3] = ["negative", "neutral", "positive"];

/// Searches tickets by free text.
///
/// Results are shown in backend order with scores untouched, cut to the
/// effective limit if the backend sends more.
pub async fn search_tickets(
    client: &BackendClient,
    input: SearchTicketsInput,
) -> Result<String, GatewayError> {
    let input = input.sanitize();

    let query = require_text("query", &input.query)?;
    let limit = SEARCH_LIMIT.apply(input.limit)?;
    let start = optional_date("start_date", input.start_date.as_deref())?;
    let end = optional_date("end_date", input.end_date.as_deref())?;
    ordered_dates(start, end)?;
    let sentiment = optional_choice("sentiment", input.sentiment.as_deref(), &SENTIMENTS)?;
    let min_frustration = optional_unit_interval("min_frustration", input.min_frustration)?;
    let priority_only = input.priority_only.unwrap_or(false);

    let mut params = SearchParams::new(query.clone()).with_limit(limit);
    if let Some(date) = start {
        params = params.with_start_date(date.format("%Y-%m-%d").to_string());
    }
    if let Some(date) = end {
        params = params.with_end_date(date.format("%Y-%m-%d").to_string());
    }
    if let Some(sentiment) = &sentiment {
        params = params.with_sentiment(sentiment.clone());
    }
    if let Some(score) = min_frustration {
        params = params.with_min_frustration(score);
    }
    if priority_only {
        params = params.with_priority_only();
    }

    tracing::debug!(query = %query, limit, "search_tickets");

    let mut response = client.search(&params).await?;
    response.results.truncate(limit as usize);

    if response.results.is_empty() {
        tracing::info!(code = codes::NO_RESULTS, query = %query, "Search returned no results");
        return Ok(format::format_no_results(&query));
    }

    // Backend echo wins; fall back to what was sent.
    let filters = response
        .filters
        .take()
        .filter(|f| !f.active().is_empty())
        .unwrap_or(SearchFilters {
            start_date: start.map(|d| d.format("%Y-%m-%d").to_string()),
            end_date: end.map(|d| d.format("%Y-%m-%d").to_string()),
            sentiment,
            min_frustration,
            priority_only: priority_only.then_some(true),
        });

    Ok(format::format_search_results(
        &query,
        Some(&filters),
        &response.results,
    ))
}

/// Fetches one ticket with its human notes, oldest first.
pub async fn get_ticket_details(
    client: &BackendClient,
    input: GetTicketDetailsInput,
) -> Result<String, GatewayError> {
    let task_id = require_positive_id("task_id", input.task_id)?;

    tracing::debug!(task_id, "get_ticket_details");

    let ticket = client.get_ticket(task_id).await?.with_human_notes();
    Ok(format::format_ticket_details(&ticket))
}

/// Finds tickets similar to a given one.
pub async fn get_related_tickets(
    client: &BackendClient,
    input: GetRelatedTicketsInput,
) -> Result<String, GatewayError> {
    let task_id = require_positive_id("task_id", input.task_id)?;
    let limit = RELATED_LIMIT.apply(input.limit)?;

    tracing::debug!(task_id, limit, "get_related_tickets");

    let mut response = client.related_tickets(task_id, limit).await?;
    response.results.truncate(limit as usize);

    if response.results.is_empty() {
        tracing::info!(code = codes::NO_RESULTS, task_id, "No related tickets");
    }

    Ok(format::format_related_tickets(
        task_id,
        response.source.as_ref(),
        &response.results,
    ))
}

/// Fetches human notes for many tickets in one backend round trip.
pub async fn get_tickets_notes(
    client: &BackendClient,
    input: GetTicketsNotesInput,
) -> Result<String, GatewayError> {
    let input = input.sanitize();
    let requested = merge_identifiers(input.task_ids.as_deref(), input.task_numbers.as_deref())?;

    tracing::debug!(count = requested.len(), "get_tickets_notes");

    let request = BulkNotesRequest::from_identifiers(&requested);
    let response = client.bulk_notes(&request).await?;
    let result = aggregate(&requested, response);

    let unrecognized = result.groups.iter().filter(|g| !g.recognized).count();
    if unrecognized > 0 {
        tracing::info!(unrecognized, "Some requested tickets were not recognized");
    }

    Ok(format::format_bulk_notes(&result))
}
