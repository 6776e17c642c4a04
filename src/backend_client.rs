//! HTTP client for the ticket search API.
//!
//! This module provides the `BackendClient` struct for making authenticated
//! requests to the search backend. Every transport or HTTP failure is
//! classified into a [`GatewayError`] here; nothing above this module sees
//! a `reqwest::Error` or a raw status code.
//!
//! There is no retry: a classified error is returned immediately and the
//! caller decides whether to try again.
//!
//! # Security
//!
//! The API key is never logged. Error bodies are sanitized and truncated
//! before they are stored in an error.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{codes, GatewayError};
use crate::models::{BulkNotesRequest, BulkNotesResponse, RelatedResponse, SearchResponse, Ticket};

/// Path of the combined-ranking search endpoint.
const SEARCH_PATH: &str = "/api/search/double-reranked/";

/// Path of the bulk notes endpoint.
const BULK_NOTES_PATH: &str = "/api/tickets/notes/bulk/";

/// Maximum length for backend error bodies kept in an error.
const MAX_ERROR_BODY_LEN: usize = 500;

/// What a request carries besides the path.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Nothing.
    None,
    /// Query string pairs.
    Query(Vec<(&'static str, String)>),
    /// JSON body.
    Json(serde_json::Value),
}

/// HTTP client for the search API.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = BackendClient::new(&config)?;
///
/// let response = client.search(&SearchParams::new("vpn").with_limit(5)).await?;
/// ```
#[derive(Clone)]
pub struct BackendClient {
    /// The underlying HTTP client.
    http: Client,

    /// Base URL, without trailing slash.
    base_url: String,

    /// Bearer token.
    /// SECURITY: Never log this value!
    api_key: String,

    /// Per-request deadline, applied by `http`.
    timeout: Duration,
}

impl BackendClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::MissingCredential` if the configured key is
    /// empty, so no request can ever go out unauthenticated, and
    /// `GatewayError::Unexpected` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            tracing::error!(code = codes::MISSING_CREDENTIAL, "No API key configured");
            return Err(GatewayError::MissingCredential);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::unexpected(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: config.timeout,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a reference to the API key for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub(crate) fn api_key_for_sanitization(&self) -> &str {
        &self.api_key
    }

    /// Issues one authenticated request and decodes the JSON response.
    ///
    /// A 404 whose body is a JSON object is reported as
    /// `NotFound { id: "resource" }`; callers that know which resource they
    /// asked for replace the id. Any other 404 is `EndpointNotFound`.
    ///
    /// # Errors
    ///
    /// Every failure is returned as a classified `GatewayError`.
    pub async fn execute<T>(&self, method: Method, path: &str, payload: Payload) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let operation = format!("{} {}", method, path);

        tracing::debug!(method = %method, path = %path, "Making search API request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");

        req = match payload {
            Payload::None => req,
            Payload::Query(pairs) => req.query(&pairs),
            Payload::Json(body) => req.json(&body),
        };

        let response = req
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e, &operation))?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response, &method).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e, &operation))?;

        tracing::trace!(body = %body, "Search API response");

        Ok(serde_json::from_str(&body)?)
    }

    /// Maps a `reqwest` transport failure to the taxonomy.
    fn classify_transport_error(&self, e: reqwest::Error, operation: &str) -> GatewayError {
        if e.is_timeout() {
            GatewayError::timeout(self.timeout, operation)
        } else if e.is_connect() {
            GatewayError::ConnectionError {
                base_url: self.base_url.clone(),
            }
        } else {
            GatewayError::unexpected(GatewayError::sanitize_message(&e.to_string(), &self.api_key))
        }
    }

    /// Converts a non-success response into a classified error.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        method: &Method,
    ) -> GatewayError {
        let body = response.text().await.unwrap_or_default();
        let body = GatewayError::sanitize_message(&body, &self.api_key);
        let json = serde_json::from_str::<serde_json::Value>(&body).ok();
        let backend_message = json.as_ref().and_then(extract_backend_message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::AuthFailed,
            StatusCode::NOT_FOUND => {
                if json.as_ref().is_some_and(serde_json::Value::is_object) {
                    GatewayError::not_found("resource")
                } else {
                    GatewayError::EndpointNotFound {
                        base_url: self.base_url.clone(),
                    }
                }
            }
            StatusCode::BAD_REQUEST => {
                let name = if *method == Method::GET { "query" } else { "body" };
                let message = backend_message
                    .unwrap_or_else(|| truncate_body(&body))
                    .trim()
                    .to_string();
                let message = if message.is_empty() {
                    "rejected by the search API".to_string()
                } else {
                    message
                };
                GatewayError::invalid_parameter(name, message)
            }
            s if s.is_server_error() => {
                tracing::warn!(status = %s, "Search API returned a server error");
                GatewayError::ServerError {
                    status: s.as_u16(),
                    message: backend_message,
                }
            }
            s => GatewayError::unexpected(format!(
                "HTTP {}: {}",
                s,
                backend_message.unwrap_or_else(|| truncate_body(&body))
            )),
        }
    }

    /// Searches tickets via the combined-ranking endpoint.
    ///
    /// # Errors
    ///
    /// Any 404 is `EndpointNotFound`: the search path names no resource.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse, GatewayError> {
        self.execute(Method::GET, SEARCH_PATH, Payload::Query(params.to_query()))
            .await
            .map_err(|e| self.endpoint_level(e))
    }

    /// Gets a ticket with all of its notes.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` naming `task_id` if the ticket
    /// doesn't exist.
    pub async fn get_ticket(&self, task_id: i64) -> Result<Ticket, GatewayError> {
        let path = format!("/api/tickets/{}/", task_id);
        self.execute(Method::GET, &path, Payload::None)
            .await
            .map_err(|e| with_ticket_id(e, task_id))
    }

    /// Gets tickets similar to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` naming `task_id` if the seed ticket
    /// doesn't exist.
    pub async fn related_tickets(&self, task_id: i64, limit: u32) -> Result<RelatedResponse, GatewayError> {
        let path = format!("/api/tickets/{}/related/", task_id);
        self.execute(
            Method::GET,
            &path,
            Payload::Query(vec![("limit", limit.to_string())]),
        )
        .await
        .map_err(|e| with_ticket_id(e, task_id))
    }

    /// Fetches the notes of many tickets in one round trip.
    ///
    /// # Errors
    ///
    /// Any 404 is `EndpointNotFound`; unknown identifiers are reported in
    /// the response body, not as an error.
    pub async fn bulk_notes(&self, request: &BulkNotesRequest) -> Result<BulkNotesResponse, GatewayError> {
        let body = serde_json::to_value(request)?;
        self.execute(Method::POST, BULK_NOTES_PATH, Payload::Json(body))
            .await
            .map_err(|e| self.endpoint_level(e))
    }

    fn endpoint_level(&self, e: GatewayError) -> GatewayError {
        if matches!(e, GatewayError::NotFound { .. }) {
            GatewayError::EndpointNotFound {
                base_url: self.base_url.clone(),
            }
        } else {
            e
        }
    }
}

/// Converts a generic NotFound to one with the specific ticket id.
fn with_ticket_id(e: GatewayError, task_id: i64) -> GatewayError {
    if matches!(e, GatewayError::NotFound { .. }) {
        GatewayError::not_found(task_id.to_string())
    } else {
        e
    }
}

/// Pulls `error` or `detail` out of a JSON error body.
fn extract_backend_message(json: &serde_json::Value) -> Option<String> {
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(truncate_body)
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

/// Parameters for a ticket search.
///
/// Use the builder methods to add filters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    query: String,
    limit: u32,
    start_date: Option<String>,
    end_date: Option<String>,
    sentiment: Option<String>,
    min_frustration: Option<f64>,
    priority_only: bool,
}

impl SearchParams {
    /// Creates parameters for `query` with the default limit of 10.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 10,
            start_date: None,
            end_date: None,
            sentiment: None,
            min_frustration: None,
            priority_only: false,
        }
    }

    /// Sets the maximum number of results.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Only tickets created on or after `date` (YYYY-MM-DD).
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Only tickets created on or before `date` (YYYY-MM-DD).
    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Filters by sentiment label.
    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment.into());
        self
    }

    /// Filters by minimum frustration score.
    pub fn with_min_frustration(mut self, score: f64) -> Self {
        self.min_frustration = Some(score);
        self
    }

    /// Only tickets flagged as priority.
    pub fn with_priority_only(mut self) -> Self {
        self.priority_only = true;
        self
    }

    /// The query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The result limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Converts parameters to query string pairs.
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.query.clone()), ("limit", self.limit.to_string())];
        if let Some(date) = &self.start_date {
            pairs.push(("start_date", date.clone()));
        }
        if let Some(date) = &self.end_date {
            pairs.push(("end_date", date.clone()));
        }
        if let Some(sentiment) = &self.sentiment {
            pairs.push(("sentiment", sentiment.clone()));
        }
        if let Some(score) = self.min_frustration {
            pairs.push(("min_frustration", score.to_string()));
        }
        if self.priority_only {
            pairs.push(("priority_only", "true".to_string()));
        }
        pairs
    }
}
