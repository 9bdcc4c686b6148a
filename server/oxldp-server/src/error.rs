//! Server error types.
//!
//! Every error kind maps to exactly one HTTP status. Handlers build errors
//! through the lowercase constructor helpers and let `IntoResponse` do the
//! status mapping; nothing backend-shaped ever reaches the transport.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use oxldp_core::{RdfParseError, RdfSerializeError};

/// Result type alias for LDP operations.
pub type LdpResult<T> = Result<T, LdpError>;

/// Error kinds of the LDP protocol core.
#[derive(Error, Debug)]
pub enum LdpError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("no acceptable representation: {0}")]
    NotAcceptable(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid container definition: {0}")]
    InvalidContainer(String),

    #[error("precondition required: an If-Match header must accompany updates")]
    PreconditionRequired,

    #[error("precondition failed")]
    PreconditionFailed,

    #[error("method not allowed")]
    MethodNotAllowed {
        /// Value for the response's `Allow` header.
        allow: &'static str,
    },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LdpError {
    pub fn not_found(uri: impl Into<String>) -> Self {
        LdpError::NotFound(uri.into())
    }

    pub fn unsupported_media_type(media_type: impl Into<String>) -> Self {
        LdpError::UnsupportedMediaType(media_type.into())
    }

    pub fn not_acceptable(accept: impl Into<String>) -> Self {
        LdpError::NotAcceptable(accept.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        LdpError::BadRequest(message.into())
    }

    pub fn invalid_container(message: impl Into<String>) -> Self {
        LdpError::InvalidContainer(message.into())
    }

    pub fn method_not_allowed(allow: &'static str) -> Self {
        LdpError::MethodNotAllowed { allow }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        LdpError::Conflict(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        LdpError::Store(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        LdpError::Internal(message.into())
    }

    /// The one status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            LdpError::NotFound(_) => StatusCode::NOT_FOUND,
            LdpError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            LdpError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            LdpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            LdpError::InvalidContainer(_) | LdpError::Conflict(_) => StatusCode::CONFLICT,
            LdpError::PreconditionRequired => StatusCode::PRECONDITION_REQUIRED,
            LdpError::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            LdpError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            LdpError::Store(_) | LdpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LdpError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 5xx details stay in the log, not the body.
        let body = match &self {
            LdpError::Store(_) | LdpError::Internal(_) => "internal server error".to_owned(),
            other => other.to_string(),
        };
        match self {
            LdpError::MethodNotAllowed { allow } => {
                (status, [(header::ALLOW, allow)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

impl From<RdfParseError> for LdpError {
    fn from(err: RdfParseError) -> Self {
        LdpError::bad_request(err.to_string())
    }
}

impl From<RdfSerializeError> for LdpError {
    fn from(err: RdfSerializeError) -> Self {
        LdpError::internal(err.to_string())
    }
}
