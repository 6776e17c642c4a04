//! Search and related-ticket result models.

use serde::{Deserialize, Serialize};

use super::{deserialize_optional_label, first_text, TicketRef};

/// One ranked hit from the combined-ranking search endpoint.
///
/// The score and rank are backend-assigned and passed through untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSearchResult")]
pub struct SearchResult {
    /// Numeric ticket id.
    pub id: i64,

    /// Human-readable ticket number.
    pub task_number: Option<String>,

    /// Ticket title.
    pub title: Option<String>,

    /// Matched snippet or description.
    pub description: Option<String>,

    /// Creation timestamp as sent by the backend.
    pub created: Option<String>,

    /// Relevance (or similarity) score.
    pub score: Option<f64>,

    /// 1-based position in the backend ordering, if sent.
    pub rank: Option<u32>,

    /// Status label or code.
    pub status: Option<String>,

    /// Priority label or code.
    pub priority: Option<String>,

    /// Sentiment classification: negative, neutral or positive.
    pub sentiment: Option<String>,

    /// Frustration score between 0 and 1.
    pub frustration_score: Option<f64>,

    /// Set when the backend flags the ticket as priority.
    pub is_priority: Option<bool>,
}

/// Wire shape of [`SearchResult`].
///
/// A hit may carry both a record `id` and the Autotask `task_id`; the
/// latter is what detail and related lookups take, so it wins.
#[derive(Deserialize)]
struct RawSearchResult {
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
    snippet: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    create_date: Option<String>,
    #[serde(default)]
    relevance_score: Option<f64>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    rank: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_label")]
    priority: Option<String>,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    frustration_score: Option<f64>,
    #[serde(default)]
    is_priority: Option<bool>,
}

impl TryFrom<RawSearchResult> for SearchResult {
    type Error = String;

    fn try_from(raw: RawSearchResult) -> Result<Self, Self::Error> {
        let id = raw
            .task_id
            .or(raw.id)
            .ok_or_else(|| "result without `task_id` or `id`".to_string())?;
        Ok(SearchResult {
            id,
            task_number: first_text(raw.task_number, raw.ticket_number),
            title: raw.title,
            description: first_text(raw.snippet, raw.description),
            created: first_text(raw.created, raw.create_date),
            score: raw.relevance_score.or(raw.score),
            rank: raw.rank,
            status: raw.status,
            priority: raw.priority,
            sentiment: raw.sentiment,
            frustration_score: raw.frustration_score,
            is_priority: raw.is_priority,
        })
    }
}

/// A hit from the similarity endpoint. Same shape as a search hit.
pub type RelatedTicketResult = SearchResult;

/// Filters echoed back by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Lower bound on creation date.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Upper bound on creation date.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Sentiment filter.
    #[serde(default)]
    pub sentiment: Option<String>,
    /// Minimum frustration score.
    #[serde(default)]
    pub min_frustration: Option<f64>,
    /// Priority-only flag.
    #[serde(default)]
    pub priority_only: Option<bool>,
}

impl SearchFilters {
    /// Renders the active filters as `name=value` pairs.
    pub fn active(&self) -> Vec<String> {
        let mut active = Vec::new();
        if let Some(v) = &self.start_date {
            active.push(format!("start_date={}", v));
        }
        if let Some(v) = &self.end_date {
            active.push(format!("end_date={}", v));
        }
        if let Some(v) = &self.sentiment {
            active.push(format!("sentiment={}", v));
        }
        if let Some(v) = self.min_frustration {
            active.push(format!("min_frustration={}", v));
        }
        if self.priority_only == Some(true) {
            active.push("priority_only=true".to_string());
        }
        active
    }
}

/// Body of `GET /api/search/double-reranked/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Hits in backend order.
    #[serde(default)]
    pub results: Vec<SearchResult>,

    /// Filters the backend applied.
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

/// Body of `GET /api/tickets/<id>/related/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawRelatedResponse")]
pub struct RelatedResponse {
    /// The seed ticket, if echoed.
    pub source: Option<TicketRef>,

    /// Similar tickets in backend order.
    pub results: Vec<RelatedTicketResult>,
}

#[derive(Deserialize)]
struct RawRelatedResponse {
    #[serde(default)]
    source: Option<TicketRef>,
    #[serde(default)]
    source_ticket: Option<TicketRef>,
    #[serde(default)]
    results: Option<Vec<RelatedTicketResult>>,
    #[serde(default)]
    related: Option<Vec<RelatedTicketResult>>,
}

impl From<RawRelatedResponse> for RelatedResponse {
    fn from(raw: RawRelatedResponse) -> Self {
        RelatedResponse {
            source: raw.source.or(raw.source_ticket),
            results: raw
                .results
                .filter(|r| !r.is_empty())
                .or(raw.related)
                .unwrap_or_default(),
        }
    }
}
