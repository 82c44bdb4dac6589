//! Error types and HTTP response conversion
//!
//! [`ParseError`] is the client-input error every parser returns. It is never
//! retryable: the request has to be corrected. [`Error`] is the crate-level
//! error for everything around the parsers (configuration, query decoding).
//!
//! # Example
//!
//! ```rust
//! use query_directives::{parse_filters, FieldPolicy, ParseError};
//!
//! let policy = FieldPolicy::new().with_fields(["age"]);
//! let err = parse_filters(Some("name:eq:bob"), &policy).unwrap_err();
//!
//! assert_eq!(err, ParseError::DisallowedField("name".to_string()));
//! assert_eq!(err.code(), "DISALLOWED_FIELD");
//! assert_eq!(err.to_string(), "Invalid filter property: name");
//! ```

use thiserror::Error;

#[cfg(feature = "http")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(feature = "http")]
use serde::{Deserialize, Serialize};

/// A rejected filter, sort or pagination directive
///
/// Each variant carries the offending token so the message can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The filter directive matches neither the binary nor the nullary grammar
    #[error("Invalid filter parameter: {0}")]
    InvalidFilterSyntax(String),

    /// The property is not in the endpoint's allow-list
    #[error("Invalid filter property: {0}")]
    DisallowedField(String),

    /// The rule token is not a known filter rule
    #[error("Invalid filter rule: {0}")]
    UnknownRule(String),

    /// The rule is not in the endpoint's allow-list
    #[error("Filter rule `{0}` not allowed")]
    DisallowedRule(String),

    /// The sort directive does not match `property:asc|desc`
    #[error("Invalid sort parameter: {0}")]
    InvalidSortSyntax(String),

    /// The page limit is smaller than the configured minimum
    #[error("Page limit should not be less than {min} (got {limit})")]
    LimitBelowMinimum { limit: i64, min: i64 },

    /// The page limit is larger than the configured maximum
    #[error("Page limit should not be greater than {max} (got {limit})")]
    LimitAboveMaximum { limit: i64, max: i64 },

    /// No positive page limit could be determined
    #[error("Invalid page limit: {0:?}")]
    InvalidLimit(String),

    /// The page is too far out to compute an offset
    #[error("Page {page} with limit {limit} is out of range")]
    OffsetOverflow { page: u64, limit: u64 },
}

impl ParseError {
    /// Stable machine-readable code for this error
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidFilterSyntax(_) => "INVALID_FILTER_SYNTAX",
            Self::DisallowedField(_) => "DISALLOWED_FIELD",
            Self::UnknownRule(_) => "UNKNOWN_RULE",
            Self::DisallowedRule(_) => "DISALLOWED_RULE",
            Self::InvalidSortSyntax(_) => "INVALID_SORT_SYNTAX",
            Self::LimitBelowMinimum { .. } => "LIMIT_BELOW_MINIMUM",
            Self::LimitAboveMaximum { .. } => "LIMIT_ABOVE_MAXIMUM",
            Self::InvalidLimit(_) => "INVALID_LIMIT",
            Self::OffsetOverflow { .. } => "OFFSET_OVERFLOW",
        }
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// A directive was rejected
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The raw query string could not be decoded
    #[error("Malformed query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown endpoint or other lookup failure
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[cfg(feature = "http")]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

#[cfg(feature = "http")]
impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

#[cfg(feature = "http")]
impl IntoResponse for ParseError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = ErrorResponse::with_code(status, self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(feature = "http")]
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Parse(e) => return e.into_response(),
            Error::Query(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "MALFORMED_QUERY", e.to_string()),
            ),
            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ),
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "Configuration error",
                    ),
                )
            }
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "I/O operation failed",
                    ),
                )
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}
