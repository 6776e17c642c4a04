//! Bulk notes request and result models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Note, TicketRef};

/// One requested ticket, by id or by number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketIdentifier {
    /// Numeric ticket id.
    Id(i64),
    /// Human-readable ticket number.
    Number(String),
}

impl TicketIdentifier {
    /// Returns true if the ticket reference names the same ticket.
    pub fn matches_ticket(&self, ticket: &TicketRef) -> bool {
        match self {
            TicketIdentifier::Id(id) => ticket.id == Some(*id),
            TicketIdentifier::Number(number) => ticket
                .task_number
                .as_deref()
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(number)),
        }
    }
}

impl fmt::Display for TicketIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketIdentifier::Id(id) => write!(f, "id {}", id),
            TicketIdentifier::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Body of `POST /api/tickets/notes/bulk/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkNotesRequest {
    /// Requested ticket ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_ids: Vec<i64>,

    /// Requested ticket numbers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_numbers: Vec<String>,
}

impl BulkNotesRequest {
    /// Splits a merged identifier list back into the two wire arrays,
    /// preserving order within each kind.
    pub fn from_identifiers(identifiers: &[TicketIdentifier]) -> Self {
        let mut request = Self::default();
        for identifier in identifiers {
            match identifier {
                TicketIdentifier::Id(id) => request.task_ids.push(*id),
                TicketIdentifier::Number(number) => request.task_numbers.push(number.clone()),
            }
        }
        request
    }
}

/// Identifiers the backend could not resolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotFoundIdentifiers {
    /// Unknown ids.
    #[serde(default)]
    pub task_ids: Vec<i64>,
    /// Unknown numbers.
    #[serde(default)]
    pub task_numbers: Vec<String>,
}

impl NotFoundIdentifiers {
    /// Returns true if the identifier is listed.
    pub fn contains(&self, identifier: &TicketIdentifier) -> bool {
        match identifier {
            TicketIdentifier::Id(id) => self.task_ids.contains(id),
            TicketIdentifier::Number(number) => self
                .task_numbers
                .iter()
                .any(|n| n.trim().eq_ignore_ascii_case(number)),
        }
    }
}

/// Body returned by the bulk notes endpoint: one flat list of notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkNotesResponse {
    /// Notes of every requested ticket, in backend order.
    #[serde(default)]
    pub notes: Vec<Note>,

    /// Tickets the backend resolved, when it reports them.
    #[serde(default)]
    pub tickets: Option<Vec<TicketRef>>,

    /// Identifiers the backend did not recognize, when it reports them.
    #[serde(default)]
    pub not_found: Option<NotFoundIdentifiers>,
}

/// Notes of one requested ticket.
#[derive(Debug, Clone)]
pub struct NoteGroup {
    /// The identifier as requested.
    pub identifier: TicketIdentifier,

    /// What the backend told us about the ticket, if anything.
    pub ticket: Option<TicketRef>,

    /// Human notes, oldest first.
    pub notes: Vec<Note>,

    /// False when the backend did not recognize the identifier.
    pub recognized: bool,
}

/// Aggregated bulk notes: exactly one group per requested identifier, in
/// request order.
#[derive(Debug, Clone, Default)]
pub struct BulkNotesResult {
    /// The groups.
    pub groups: Vec<NoteGroup>,
}

impl BulkNotesResult {
    /// Total number of notes across all groups.
    pub fn total_notes(&self) -> usize {
        self.groups.iter().map(|g| g.notes.len()).sum()
    }
}
