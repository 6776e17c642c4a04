//! Text rendering of tickets, search hits and bulk notes.
//!
//! Pure functions, no I/O. Layout per entry is fixed: ticket number, id,
//! relevance (when present), title, description or snippet, timestamp,
//! then a separator. Bodies are never truncated here.

use crate::error::codes;
use crate::models::{
    display_timestamp, BulkNotesResult, Note, NoteGroup, RelatedTicketResult, SearchFilters,
    SearchResult, Ticket, TicketRef,
};

const SEPARATOR: &str = "----------------------------------------";

/// Signals a successful query with zero matches.
pub fn format_no_results(query: &str) -> String {
    format!("No tickets found for \"{}\". [{}]", query, codes::NO_RESULTS)
}

/// Signals a successful similarity query with zero matches.
pub fn format_no_related(task_id: i64) -> String {
    format!(
        "No related tickets found for ticket {}. [{}]",
        task_id,
        codes::NO_RESULTS
    )
}

/// Formats search hits in backend order.
pub fn format_search_results(
    query: &str,
    filters: Option<&SearchFilters>,
    results: &[SearchResult],
) -> String {
    if results.is_empty() {
        return format_no_results(query);
    }

    let mut output = format!("Found {} result(s) for \"{}\":\n", results.len(), query);
    if let Some(active) = filters.map(SearchFilters::active).filter(|a| !a.is_empty()) {
        output.push_str(&format!("Filters: {}\n", active.join(", ")));
    }
    output.push('\n');

    for (position, result) in results.iter().enumerate() {
        push_result(&mut output, position, result);
    }

    output
}

/// Formats similar tickets in backend order.
pub fn format_related_tickets(
    task_id: i64,
    source: Option<&TicketRef>,
    results: &[RelatedTicketResult],
) -> String {
    if results.is_empty() {
        return format_no_related(task_id);
    }

    let seed = match source.and_then(|s| s.task_number.as_deref()) {
        Some(number) => format!("{} (id {})", number, task_id),
        None => format!("id {}", task_id),
    };
    let mut output = format!("Found {} ticket(s) related to {}", results.len(), seed);
    if let Some(title) = source.and_then(|s| s.title.as_deref()) {
        output.push_str(&format!(": {}", title));
    }
    output.push_str("\n\n");

    for (position, result) in results.iter().enumerate() {
        push_result(&mut output, position, result);
    }

    output
}

fn push_result(output: &mut String, position: usize, result: &SearchResult) {
    let rank = result.rank.map_or(position + 1, |r| r as usize);
    let number = result.task_number.as_deref().unwrap_or("(no number)");

    output.push_str(&format!("[{}] {} (id {})", rank, number, result.id));
    if let Some(score) = result.score {
        output.push_str(&format!(" | relevance: {}", score));
    }
    output.push('\n');

    output.push_str(&format!(
        "Title: {}\n",
        result.title.as_deref().unwrap_or("(No title)")
    ));
    if let Some(description) = result.description.as_deref().filter(|d| !d.trim().is_empty()) {
        output.push_str(description.trim_end());
        output.push('\n');
    }
    if let Some(created) = &result.created {
        output.push_str(&format!("Created: {}\n", display_timestamp(created)));
    }

    let mut extra = Vec::new();
    if let Some(status) = &result.status {
        extra.push(format!("Status: {}", status));
    }
    if let Some(priority) = &result.priority {
        extra.push(format!("Priority: {}", priority));
    }
    if let Some(sentiment) = &result.sentiment {
        extra.push(format!("Sentiment: {}", sentiment));
    }
    if let Some(frustration) = result.frustration_score {
        extra.push(format!("Frustration: {}", frustration));
    }
    if result.is_priority == Some(true) {
        extra.push("[PRIORITY]".to_string());
    }
    if !extra.is_empty() {
        output.push_str(&extra.join(" | "));
        output.push('\n');
    }

    output.push_str(SEPARATOR);
    output.push('\n');
}

/// Formats a full ticket. Expects notes already filtered and ordered.
pub fn format_ticket_details(ticket: &Ticket) -> String {
    let mut output = String::new();

    let number = ticket.task_number.as_deref().unwrap_or("(no number)");
    output.push_str(&format!("Ticket {} (id {})\n", number, ticket.id));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    output.push_str(&format!("Title: {}\n", ticket.display_title()));
    output.push_str(&format!(
        "Status: {} | Priority: {}\n",
        ticket.status.as_deref().unwrap_or("Unknown"),
        ticket.priority.as_deref().unwrap_or("Unknown")
    ));
    if let Some(created) = &ticket.created {
        output.push_str(&format!("Created: {}\n", display_timestamp(created)));
    }

    if let Some(description) = ticket.description.as_deref().filter(|d| !d.trim().is_empty()) {
        output.push_str("\n--- Description ---\n");
        output.push_str(description.trim_end());
        output.push('\n');
    }

    output.push_str(&format!("\n--- Notes ({}) ---\n", ticket.notes.len()));
    if ticket.notes.is_empty() {
        output.push_str("(no human notes)\n");
    }
    for note in &ticket.notes {
        push_note(&mut output, note);
    }

    output
}

fn push_note(output: &mut String, note: &Note) {
    let when = note
        .created
        .as_deref()
        .map(display_timestamp)
        .unwrap_or_else(|| "unknown time".to_string());
    output.push_str(&format!("[{}]", when));
    if let Some(title) = note.title.as_deref().filter(|t| !t.trim().is_empty()) {
        output.push_str(&format!(" {}", title.trim()));
    }
    output.push('\n');
    output.push_str(note.display_content().trim_end());
    output.push('\n');
    output.push_str(SEPARATOR);
    output.push('\n');
}

/// Formats bulk notes, one section per requested identifier.
pub fn format_bulk_notes(result: &BulkNotesResult) -> String {
    let mut output = format!(
        "Notes for {} ticket(s), {} note(s) total:\n",
        result.groups.len(),
        result.total_notes()
    );

    for group in &result.groups {
        output.push('\n');
        push_group(&mut output, group);
    }

    output
}

fn push_group(output: &mut String, group: &NoteGroup) {
    let ticket = group.ticket.as_ref();
    let number = ticket.and_then(|t| t.task_number.as_deref());
    let id = ticket.and_then(|t| t.id);

    let heading = match (number, id) {
        (Some(n), Some(i)) => format!("{} (id {})", n, i),
        _ => group.identifier.to_string(),
    };
    output.push_str(&format!("=== {}", heading));
    if let Some(title) = ticket.and_then(|t| t.title.as_deref()) {
        output.push_str(&format!(": {}", title));
    }
    output.push_str(" ===\n");

    if !group.recognized {
        output.push_str(&format!(
            "[UNRECOGNIZED] The search API did not recognize {}.\n",
            group.identifier
        ));
    } else if group.notes.is_empty() {
        output.push_str("(no human notes)\n");
        return;
    }
    for note in &group.notes {
        push_note(output, note);
    }
}
