//! Note models for the search API.
//!
//! Notes are timestamped annotations attached to a ticket. The backend
//! returns both human-authored and system-generated notes; only the former
//! are ever shown to callers.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{first_text, parse_timestamp};

/// Who wrote a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAuthor {
    /// Written by a person.
    Human,
    /// Generated by a workflow, integration or the ticketing system itself.
    System,
}

/// A note attached to a ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawNote")]
pub struct Note {
    /// Unique note id.
    pub id: Option<i64>,

    /// Id of the owning ticket.
    pub task_id: Option<i64>,

    /// Number of the owning ticket.
    pub task_number: Option<String>,

    /// Optional note title.
    pub title: Option<String>,

    /// Note body.
    pub content: Option<String>,

    /// Creation timestamp as sent by the backend.
    pub created: Option<String>,

    /// Set by the backend for notes it generated itself.
    pub is_system_generated: Option<bool>,
}

/// Wire shape of [`Note`]; every spelling the backend uses is its own field.
#[derive(Deserialize)]
struct RawNote {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    ticket_id: Option<i64>,
    #[serde(default)]
    task_number: Option<String>,
    #[serde(default)]
    ticket_number: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    create_date: Option<String>,
    #[serde(default)]
    is_system_generated: Option<bool>,
    #[serde(default)]
    is_system: Option<bool>,
}

impl From<RawNote> for Note {
    fn from(raw: RawNote) -> Self {
        Note {
            id: raw.id,
            task_id: raw.task_id.or(raw.ticket_id),
            task_number: first_text(raw.task_number, raw.ticket_number),
            title: raw.title,
            content: first_text(raw.content, raw.description),
            created: first_text(raw.created, raw.create_date),
            is_system_generated: raw.is_system_generated.or(raw.is_system),
        }
    }
}

impl Note {
    /// Returns the author classification. Unflagged notes count as human.
    pub fn author(&self) -> NoteAuthor {
        if self.is_system_generated == Some(true) {
            NoteAuthor::System
        } else {
            NoteAuthor::Human
        }
    }

    /// Parsed creation time, if the backend sent a usable one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(parse_timestamp)
    }

    /// Returns the note body or a placeholder.
    pub fn display_content(&self) -> &str {
        self.content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("(No content)")
    }
}

/// Drops system notes and orders the rest by creation time.
///
/// The sort is stable: notes with equal timestamps keep the order the
/// backend sent them in. Notes without a parseable timestamp go last.
pub fn human_notes_chronological(notes: Vec<Note>) -> Vec<Note> {
    let mut notes: Vec<Note> = notes
        .into_iter()
        .filter(|n| n.author() == NoteAuthor::Human)
        .collect();
    sort_chronologically(&mut notes);
    notes
}

/// Stable ascending sort by creation time, undated notes last.
pub fn sort_chronologically(notes: &mut [Note]) {
    notes.sort_by_key(|n| {
        let ts = n.timestamp();
        (ts.is_none(), ts)
    });
}

#[cfg(test)]
pub(crate) fn test_note(id: i64, created: Option<&str>, system: bool) -> Note {
    Note {
        id: Some(id),
        task_id: None,
        task_number: None,
        title: None,
        content: Some(format!("note {}", id)),
        created: created.map(str::to_string),
        is_system_generated: Some(system),
    }
}
