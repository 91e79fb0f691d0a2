//! Error types and HTTP response conversion

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Query parameters could not be interpreted
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// A query-string parameter that failed to parse
///
/// Every variant describes caller input that cannot be turned into
/// [`QueryOptions`](crate::QueryOptions). None of them are retriable: the same
/// input fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A JSON-encoded parameter is not valid JSON, has the wrong shape, or a
    /// scalar parameter does not parse
    #[error("Malformed `{parameter}` parameter: {reason}")]
    MalformedParameter {
        /// Logical parameter name (`filters`, `limit`, ...)
        parameter: String,
        /// What was wrong with it
        reason: String,
    },

    /// A required structural key is absent from a parsed entry
    #[error("Missing required key `{key}`")]
    MissingKey {
        /// The missing key
        key: String,
    },

    /// Parameters that cannot be used together
    #[error("Invalid parameter combination: {0}")]
    InvalidCombination(String),

    /// An enumerated value was not recognized
    #[error("Invalid value `{value}` for `{parameter}`")]
    InvalidValue {
        /// Logical parameter name
        parameter: String,
        /// The rejected value
        value: String,
    },
}

impl ParseError {
    /// Create a malformed parameter error
    pub fn malformed(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing key error
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// The category of this error
    #[must_use]
    pub const fn kind(&self) -> ParseErrorKind {
        match self {
            Self::MalformedParameter { .. } => ParseErrorKind::MalformedParameter,
            Self::MissingKey { .. } => ParseErrorKind::MissingKey,
            Self::InvalidCombination(_) => ParseErrorKind::InvalidCombination,
            Self::InvalidValue { .. } => ParseErrorKind::InvalidValue,
        }
    }

    /// Stable error code for response bodies, e.g. `MISSING_KEY`
    #[must_use]
    pub fn error_code(&self) -> String {
        self.kind().to_string().to_uppercase()
    }

    /// All parse errors are client errors
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Category of [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Invalid JSON, wrong shape, or unparseable scalar
    MalformedParameter,
    /// Required key absent
    MissingKey,
    /// Conflicting parameters
    InvalidCombination,
    /// Unrecognized enumerated value
    InvalidValue,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedParameter => write!(f, "malformed_parameter"),
            Self::MissingKey => write!(f, "missing_key"),
            Self::InvalidCombination => write!(f, "invalid_combination"),
            Self::InvalidValue => write!(f, "invalid_value"),
        }
    }
}

/// Error response body
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

impl ErrorResponse {
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

impl IntoResponse for ParseError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = %self.kind(), "Rejected query parameters: {}", self);

        let status = self.status_code();
        let body = ErrorResponse::with_code(status, self.error_code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Parse(e) => e.into_response(),
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    Json(ErrorResponse::with_code(status, "CONFIG_ERROR", e.to_string())),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_with_code() {
        let err = ErrorResponse::with_code(StatusCode::BAD_REQUEST, "MISSING_KEY", "no filters");
        assert_eq!(err.status, 400);
        assert_eq!(err.code, Some("MISSING_KEY".to_string()));
    }

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(
            ParseError::malformed("filters", "trailing comma").error_code(),
            "MALFORMED_PARAMETER"
        );
        assert_eq!(ParseError::missing_key("filters").error_code(), "MISSING_KEY");
        assert_eq!(
            ParseError::InvalidCombination("page requires limit".into()).error_code(),
            "INVALID_COMBINATION"
        );
        assert_eq!(
            ParseError::invalid_value("includes", "inline").error_code(),
            "INVALID_VALUE"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::missing_key("resource");
        assert_eq!(err.to_string(), "Missing required key `resource`");

        let err = ParseError::malformed("limit", "expected a positive integer");
        assert_eq!(
            err.to_string(),
            "Malformed `limit` parameter: expected a positive integer"
        );
    }

    #[test]
    fn test_parse_error_is_bad_request() {
        let response = ParseError::missing_key("filters").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_is_internal() {
        let err: Error = figment::Error::from("bad value".to_string()).into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_error_converts_into_error() {
        let err: Error = ParseError::missing_key("filters").into();
        assert!(matches!(err, Error::Parse(ParseError::MissingKey { .. })));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
