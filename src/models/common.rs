//! Helpers shared by the backend payload models.
//!
//! The search API serializes some fields inconsistently (status and
//! priority arrive either as labels or as numeric codes, timestamps in
//! several ISO-8601 flavours). These helpers absorb that drift so the
//! record types can stay strictly typed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal reference to a ticket, as echoed by the related and bulk
/// endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTicketRef")]
pub struct TicketRef {
    /// Numeric ticket id.
    pub id: Option<i64>,

    /// Human-readable ticket number, e.g. `T20240216.0023`.
    pub task_number: Option<String>,

    /// Ticket title.
    pub title: Option<String>,
}

/// Wire shape of [`TicketRef`]. `task_id` wins over `id` when both are sent.
#[derive(Deserialize)]
struct RawTicketRef {
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
}

impl From<RawTicketRef> for TicketRef {
    fn from(raw: RawTicketRef) -> Self {
        TicketRef {
            id: raw.task_id.or(raw.id),
            task_number: first_text(raw.task_number, raw.ticket_number),
            title: raw.title,
        }
    }
}

/// Returns the first candidate holding non-blank text.
///
/// The backend spells several fields two ways and sometimes sends both;
/// the wire structs keep each spelling separate and collapse them here.
pub(crate) fn first_text(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|s| !s.trim().is_empty())
        .or_else(|| fallback.filter(|s| !s.trim().is_empty()))
}

/// Deserializes an optional label that may be sent as a string or a number.
pub(crate) fn deserialize_optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct OptionalLabelVisitor;

    impl<'de> Visitor<'de> for OptionalLabelVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("null, a string, or a number")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }
    }

    deserializer.deserialize_option(OptionalLabelVisitor)
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339, naive date-times (`T` or space separated, optional
/// fraction; taken as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Renders a backend timestamp as `YYYY-MM-DD HH:MM UTC`, falling back to
/// the raw value when it cannot be parsed.
pub fn display_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => raw.trim().to_string(),
    }
}
