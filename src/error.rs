//! Error types
//!
//! Registration errors fail loudly through `RouteError`. Everything that can
//! go wrong while dispatching is captured by `DispatchError` and turned into a
//! response by the gateway; it never reaches the caller.

use hyper::{Method, StatusCode};
use thiserror::Error;

/// Boxed error a handler can wrap into [`HandlerError::Internal`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Raised while building an [`App`](crate::App); these are programming mistakes.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route '{path}' was registered without a handler")]
    MissingHandler { path: String },

    #[error("route '{path}' declares no accepted content types")]
    NoContentTypes { path: String },

    #[error("duplicate route: {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    #[error("route '{path}' conflicts with '{existing}': same shape, different placeholder names")]
    ConflictingPlaceholders { path: String, existing: String },
}

/// Failure signalled by a handler.
///
/// The typed variants map to client error statuses. `Internal` covers
/// everything else and always renders as a generic 500.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("internal handler failure: {0}")]
    Internal(#[source] BoxError),
}

impl HandlerError {
    /// Wrap any error as an internal failure.
    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BadRequestError",
            Self::Unauthorized(_) => "UnauthorizedError",
            Self::Forbidden(_) => "ForbiddenError",
            Self::NotFound(_) => "NotFoundError",
            Self::Conflict(_) => "ConflictError",
            Self::UnprocessableEntity(_) => "UnprocessableEntityError",
            Self::TooManyRequests(_) => "TooManyRequestsError",
            Self::Internal(_) => "InternalServerError",
        }
    }
}

/// Every non-success outcome of a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no route matches {path}")]
    NotFound { path: String },

    #[error("method {method} not allowed")]
    MethodNotAllowed { method: Method, allowed: Vec<Method> },

    #[error("request body of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("handler panicked: {0}")]
    HandlerPanicked(String),
}

impl DispatchError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Handler(err) => err.status(),
            Self::HandlerPanicked(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) | Self::MalformedBody(_) => "BadRequestError",
            Self::NotFound { .. } => "NotFoundError",
            Self::MethodNotAllowed { .. } => "MethodNotAllowedError",
            Self::PayloadTooLarge { .. } => "RequestEntityTooLargeError",
            Self::UnsupportedMediaType(_) => "UnsupportedMediaType",
            Self::Handler(err) => err.code(),
            Self::HandlerPanicked(_) => "InternalServerError",
        }
    }

    /// Message safe to show to the client. Server-side faults are not echoed.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            return "An internal server error occurred.".to_string();
        }
        self.to_string()
    }
}
