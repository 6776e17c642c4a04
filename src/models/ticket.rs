//! Ticket detail model.

use serde::Deserialize;

use super::{deserialize_optional_label, first_text, human_notes_chronological, Note};

/// Full ticket as returned by `GET /api/tickets/<id>/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTicket")]
pub struct Ticket {
    /// Numeric ticket id.
    pub id: i64,

    /// Human-readable ticket number, e.g. `T20240216.0023`.
    pub task_number: Option<String>,

    /// Ticket title.
    pub title: Option<String>,

    /// Full description. Never truncated locally.
    pub description: Option<String>,

    /// Status label or code.
    pub status: Option<String>,

    /// Priority label or code.
    pub priority: Option<String>,

    /// Creation timestamp as sent by the backend.
    pub created: Option<String>,

    /// Notes in backend order, system notes included.
    pub notes: Vec<Note>,
}

/// Wire shape of [`Ticket`]. `task_id` wins over `id` when both are sent.
#[derive(Deserialize)]
struct RawTicket {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    task_number: Option<String>,
    #[serde(default)]
    ticket_number: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    priority: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    create_date: Option<String>,
    #[serde(default)]
    notes: Vec<Note>,
}

impl TryFrom<RawTicket> for Ticket {
    type Error = String;

    fn try_from(raw: RawTicket) -> Result<Self, Self::Error> {
        let id = raw
            .task_id
            .or(raw.id)
            .ok_or_else(|| "ticket without `task_id` or `id`".to_string())?;
        Ok(Ticket {
            id,
            task_number: first_text(raw.task_number, raw.ticket_number),
            title: raw.title,
            description: raw.description,
            status: raw.status,
            priority: raw.priority,
            created: first_text(raw.created, raw.create_date),
            notes: raw.notes,
        })
    }
}

impl Ticket {
    /// Returns the title or a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(No title)")
    }

    /// Drops system notes and orders the remaining ones chronologically.
    #[must_use]
    pub fn with_human_notes(mut self) -> Self {
        self.notes = human_notes_chronological(std::mem::take(&mut self.notes));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteAuthor;

    #[test]
    fn test_ticket_deserialize() {
        let json = r#"{
            "id": 12345,
            "task_number": "T20240216.0023",
            "title": "Password reset loop",
            "description": "User cannot reset password",
            "status": "In Progress",
            "priority": 2,
            "create_date": "2024-02-16T08:00:00Z",
            "notes": [
                {"id": 2, "content": "Workflow rule fired", "created": "2024-02-16T08:01:00Z", "is_system_generated": true},
                {"id": 3, "content": "Reset MFA", "created": "2024-02-16T09:00:00Z"},
                {"id": 1, "content": "Called user", "created": "2024-02-16T08:30:00Z"}
            ]
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 12345);
        assert_eq!(ticket.priority.as_deref(), Some("2"));
        assert_eq!(ticket.notes.len(), 3);

        let ticket = ticket.with_human_notes();
        let ids: Vec<_> = ticket.notes.iter().filter_map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(ticket
            .notes
            .iter()
            .all(|n| n.author() == NoteAuthor::Human));
    }

    #[test]
    fn test_ticket_with_record_id_and_task_id() {
        let json = r#"{
            "id": 501,
            "task_id": 12345,
            "task_number": "T20240216.0023",
            "created": "2024-02-16T08:00:00Z",
            "create_date": "2024-02-16T08:00:00Z"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 12345);
        assert_eq!(ticket.created.as_deref(), Some("2024-02-16T08:00:00Z"));
    }

    #[test]
    fn test_ticket_without_any_id_is_rejected() {
        assert!(serde_json::from_str::<Ticket>(r#"{"title": "orphan"}"#).is_err());
    }

    #[test]
    fn test_ticket_minimal() {
        let ticket: Ticket = serde_json::from_str(r#"{"task_id": 7}"#).unwrap();
        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.display_title(), "(No title)");
        assert!(ticket.notes.is_empty());
    }
}
