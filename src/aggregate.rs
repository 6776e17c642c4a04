//! Bulk notes aggregation.
//!
//! Turns the caller's two identifier lists into one deduplicated request
//! and turns the backend's flat note list back into one group per
//! requested identifier.

use crate::error::GatewayError;
use crate::models::{
    sort_chronologically, BulkNotesResponse, BulkNotesResult, Note, NoteAuthor, NoteGroup,
    TicketIdentifier, TicketRef,
};
use crate::tools::validation::{at_least_one_of, require_positive_id};

/// Maximum number of distinct identifiers per bulk request.
pub const MAX_BULK_TICKETS: usize = 50;

/// Validates and merges the two identifier lists.
///
/// Ids come first, then numbers, each in caller order with later
/// duplicates dropped. Numbers are compared case-insensitively.
///
/// # Errors
///
/// - `NoParameters` if both lists are omitted
/// - `EmptyParameters` if the lists that are present are all empty
/// - `InvalidParameter` for a non-positive id or a blank number
/// - `TooManyTickets` if more than [`MAX_BULK_TICKETS`] distinct
///   identifiers remain
pub fn merge_identifiers(
    task_ids: Option<&[i64]>,
    task_numbers: Option<&[String]>,
) -> Result<Vec<TicketIdentifier>, GatewayError> {
    at_least_one_of(&[task_ids.map(<[i64]>::len), task_numbers.map(<[String]>::len)])?;

    let mut merged: Vec<TicketIdentifier> = Vec::new();

    for &id in task_ids.unwrap_or_default() {
        let id = require_positive_id("task_ids", id)?;
        let identifier = TicketIdentifier::Id(id);
        if !merged.contains(&identifier) {
            merged.push(identifier);
        }
    }

    for number in task_numbers.unwrap_or_default() {
        let number = number.trim();
        if number.is_empty() {
            return Err(GatewayError::invalid_parameter(
                "task_numbers",
                "ticket numbers cannot be blank",
            ));
        }
        let duplicate = merged.iter().any(|existing| {
            matches!(existing, TicketIdentifier::Number(n) if n.eq_ignore_ascii_case(number))
        });
        if !duplicate {
            merged.push(TicketIdentifier::Number(number.to_string()));
        }
    }

    if merged.len() > MAX_BULK_TICKETS {
        return Err(GatewayError::TooManyTickets {
            count: merged.len(),
            limit: MAX_BULK_TICKETS,
        });
    }

    Ok(merged)
}

/// Groups the backend's notes by requested identifier.
///
/// Always yields exactly `requested.len()` groups in request order. System
/// notes are dropped; each group is sorted oldest first, ties keeping
/// backend order. A note's owner is taken from its own id and number,
/// completed through the `tickets` block when the backend sends one. The
/// note is copied into every group whose identifier names that owner, so
/// an id and a number naming the same ticket both see it.
pub fn aggregate(requested: &[TicketIdentifier], response: BulkNotesResponse) -> BulkNotesResult {
    let BulkNotesResponse {
        notes,
        tickets,
        not_found,
    } = response;

    let mut partitions: Vec<Vec<Note>> = vec![Vec::new(); requested.len()];
    let mut unmatched = 0usize;

    for note in notes {
        if note.author() == NoteAuthor::System {
            continue;
        }
        let owner = resolve_owner(&note, tickets.as_deref());
        let owners: Vec<usize> = requested
            .iter()
            .enumerate()
            .filter(|(_, identifier)| identifier.matches_ticket(&owner))
            .map(|(idx, _)| idx)
            .collect();
        if owners.is_empty() {
            unmatched += 1;
            continue;
        }
        for idx in owners {
            partitions[idx].push(note.clone());
        }
    }

    if unmatched > 0 {
        tracing::debug!(unmatched, "Dropped notes not owned by any requested ticket");
    }

    let groups = requested
        .iter()
        .zip(partitions)
        .map(|(identifier, mut notes)| {
            sort_chronologically(&mut notes);

            let listed = tickets
                .as_deref()
                .and_then(|tickets| tickets.iter().find(|t| identifier.matches_ticket(t)));

            let recognized = if not_found.as_ref().is_some_and(|nf| nf.contains(identifier)) {
                false
            } else if tickets.is_some() {
                listed.is_some() || !notes.is_empty()
            } else {
                true
            };

            let ticket = listed
                .cloned()
                .or_else(|| notes.first().map(ticket_ref_from_note));

            NoteGroup {
                identifier: identifier.clone(),
                ticket,
                notes,
                recognized,
            }
        })
        .collect();

    BulkNotesResult { groups }
}

fn ticket_ref_from_note(note: &Note) -> TicketRef {
    TicketRef {
        id: note.task_id,
        task_number: note.task_number.clone(),
        title: None,
    }
}

/// The ticket a note belongs to, with whatever the note lacks (id or
/// number) filled in from the backend's `tickets` block.
fn resolve_owner(note: &Note, tickets: Option<&[TicketRef]>) -> TicketRef {
    let mut owner = ticket_ref_from_note(note);
    let listed = tickets.and_then(|tickets| tickets.iter().find(|t| same_ticket(t, &owner)));
    if let Some(listed) = listed {
        owner.id = owner.id.or(listed.id);
        owner.task_number = owner.task_number.or_else(|| listed.task_number.clone());
    }
    owner
}

fn same_ticket(a: &TicketRef, b: &TicketRef) -> bool {
    let same_id = matches!((a.id, b.id), (Some(x), Some(y)) if x == y);
    let same_number = match (a.task_number.as_deref(), b.task_number.as_deref()) {
        (Some(x), Some(y)) => x.trim().eq_ignore_ascii_case(y.trim()),
        _ => false,
    };
    same_id || same_number
}
