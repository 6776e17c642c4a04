//! Error types for the Autotask Search MCP server.
//!
//! This module defines `GatewayError`, the closed error taxonomy every
//! failure is classified into before it leaves the backend client. Each
//! variant carries a stable diagnostic code (see [`codes`]) that appears both
//! in the text returned to the caller and in the log line for the failure.
//!
//! # Security
//!
//! Messages derived from backend responses or transport errors may contain
//! the API key (for example in an echoed header). Use `sanitize_message()`
//! before storing such text in an error.

use std::time::Duration;
use thiserror::Error;

/// Stable diagnostic codes.
///
/// These are part of the external contract: operators grep logs for them
/// and callers may match on them. Never change the meaning of a code.
pub mod codes {
    /// No API credential configured.
    pub const MISSING_CREDENTIAL: &str = "MCPS-NOKEY";
    /// Malformed configuration value (startup only).
    pub const INVALID_CONFIG: &str = "MCPS-CONFIG";
    /// A tool parameter is missing, malformed, or out of bounds.
    pub const INVALID_PARAMETER: &str = "MCPS-PARAM";
    /// Bulk notes called without any identifier parameter.
    pub const NO_PARAMETERS: &str = "MCPS-NOTES-NOPARAM";
    /// Bulk notes called with only empty identifier lists.
    pub const EMPTY_PARAMETERS: &str = "MCPS-NOTES-EMPTY";
    /// Bulk notes identifier count above the limit.
    pub const TOO_MANY_TICKETS: &str = "MCPS-NOTES-LIMIT";
    /// The referenced ticket does not exist.
    pub const NOT_FOUND: &str = "MCPS-NOTFOUND";
    /// The backend rejected the credential.
    pub const AUTH_FAILED: &str = "MCPS-AUTH";
    /// Routing-level 404 from the backend.
    pub const ENDPOINT_NOT_FOUND: &str = "MCPS-404";
    /// The backend host could not be reached.
    pub const CONNECTION_ERROR: &str = "MCPS-CONN";
    /// The request exceeded its deadline.
    pub const TIMEOUT: &str = "MCPS-TIMEOUT";
    /// The backend answered with a 5xx status.
    pub const SERVER_ERROR: &str = "MCPS-SVR";
    /// A query succeeded with zero matches. Not an error.
    pub const NO_RESULTS: &str = "MCPS-NORES";
    /// Anything not classified above.
    pub const UNEXPECTED: &str = "MCPS-ERR";
}

/// Discriminant of [`GatewayError`], useful for matching without caring
/// about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`GatewayError::MissingCredential`].
    MissingCredential,
    /// See [`GatewayError::InvalidConfig`].
    InvalidConfig,
    /// See [`GatewayError::InvalidParameter`].
    InvalidParameter,
    /// See [`GatewayError::NoParameters`].
    NoParameters,
    /// See [`GatewayError::EmptyParameters`].
    EmptyParameters,
    /// See [`GatewayError::TooManyTickets`].
    TooManyTickets,
    /// See [`GatewayError::NotFound`].
    NotFound,
    /// See [`GatewayError::AuthFailed`].
    AuthFailed,
    /// See [`GatewayError::EndpointNotFound`].
    EndpointNotFound,
    /// See [`GatewayError::ConnectionError`].
    ConnectionError,
    /// See [`GatewayError::Timeout`].
    Timeout,
    /// See [`GatewayError::ServerError`].
    ServerError,
    /// See [`GatewayError::Unexpected`].
    Unexpected,
}

/// Unified error type for all gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No API credential is configured.
    #[error("AUTOTASK_API_KEY is not set - add it to your .env file or MCP client config")]
    MissingCredential,

    /// A configuration value is present but malformed.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// A tool parameter is missing, has the wrong type, or is out of bounds.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// The parameter name as exposed in the tool schema.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// Bulk notes was called with neither `task_ids` nor `task_numbers`.
    #[error("at least one of task_ids or task_numbers must be provided")]
    NoParameters,

    /// Bulk notes was called with identifier lists that are all empty.
    #[error("task_ids and task_numbers cannot both be empty lists")]
    EmptyParameters,

    /// Bulk notes was called with more distinct identifiers than allowed.
    #[error("cannot request more than {limit} tickets at once (requested {count})")]
    TooManyTickets {
        /// Number of distinct identifiers requested.
        count: usize,
        /// The maximum accepted.
        limit: usize,
    },

    /// The referenced ticket does not exist on the backend.
    #[error("ticket {id} not found")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// The backend rejected the API key.
    #[error("authentication failed - the AUTOTASK_API_KEY may be invalid or expired")]
    AuthFailed,

    /// The backend has no route for the request path.
    #[error("API endpoint not found at {base_url} - check that the search service is running and AUTOTASK_API_BASE_URL is correct")]
    EndpointNotFound {
        /// The configured base URL.
        base_url: String,
    },

    /// The backend host could not be reached.
    #[error("could not connect to the search API at {base_url}")]
    ConnectionError {
        /// The configured base URL.
        base_url: String,
    },

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {duration:?} ({operation}) - try a more specific query or check server performance")]
    Timeout {
        /// How long we waited.
        duration: Duration,
        /// The operation that timed out, e.g. `GET /api/tickets/42/`.
        operation: String,
    },

    /// The backend answered with a 5xx status.
    #[error("server error ({status}) - the search service may be experiencing issues")]
    ServerError {
        /// The HTTP status code.
        status: u16,
        /// Backend-supplied message, if any.
        message: Option<String>,
    },

    /// Any outcome not classified above.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Description of what happened.
        message: String,
    },
}

impl GatewayError {
    /// Creates a parameter validation error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error for a ticket identifier.
    pub fn not_found(id: impl Into<String>) -> Self {
        GatewayError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        GatewayError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        GatewayError::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingCredential => ErrorKind::MissingCredential,
            GatewayError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            GatewayError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            GatewayError::NoParameters => ErrorKind::NoParameters,
            GatewayError::EmptyParameters => ErrorKind::EmptyParameters,
            GatewayError::TooManyTickets { .. } => ErrorKind::TooManyTickets,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::AuthFailed => ErrorKind::AuthFailed,
            GatewayError::EndpointNotFound { .. } => ErrorKind::EndpointNotFound,
            GatewayError::ConnectionError { .. } => ErrorKind::ConnectionError,
            GatewayError::Timeout { .. } => ErrorKind::Timeout,
            GatewayError::ServerError { .. } => ErrorKind::ServerError,
            GatewayError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Returns the stable diagnostic code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingCredential => codes::MISSING_CREDENTIAL,
            ErrorKind::InvalidConfig => codes::INVALID_CONFIG,
            ErrorKind::InvalidParameter => codes::INVALID_PARAMETER,
            ErrorKind::NoParameters => codes::NO_PARAMETERS,
            ErrorKind::EmptyParameters => codes::EMPTY_PARAMETERS,
            ErrorKind::TooManyTickets => codes::TOO_MANY_TICKETS,
            ErrorKind::NotFound => codes::NOT_FOUND,
            ErrorKind::AuthFailed => codes::AUTH_FAILED,
            ErrorKind::EndpointNotFound => codes::ENDPOINT_NOT_FOUND,
            ErrorKind::ConnectionError => codes::CONNECTION_ERROR,
            ErrorKind::Timeout => codes::TIMEOUT,
            ErrorKind::ServerError => codes::SERVER_ERROR,
            ErrorKind::Unexpected => codes::UNEXPECTED,
        }
    }

    /// Renders the error the way tool callers see it: `Error [CODE]: message`.
    ///
    /// A backend-supplied message on `ServerError` is appended.
    #[must_use]
    pub fn to_tool_message(&self) -> String {
        match self {
            GatewayError::ServerError {
                message: Some(detail),
                ..
            } => format!("Error [{}]: {} ({})", self.code(), self, detail),
            _ => format!("Error [{}]: {}", self.code(), self),
        }
    }

    /// Sanitizes an error message to remove any occurrence of the API key.
    ///
    /// Replaces the key with `[REDACTED]`. An empty key leaves the message
    /// untouched.
    #[must_use]
    pub fn sanitize_message(message: &str, api_key: &str) -> String {
        if api_key.is_empty() {
            return message.to_string();
        }
        message.replace(api_key, "[REDACTED]")
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::unexpected(format!("malformed response from search API: {}", err))
    }
}
