//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Unprocessable`] → 422
/// - [`ServiceError::Unavailable`] → 503
///
/// Messages are shown to the user verbatim, so they must name fields and
/// forms only. Answer values, ciphertext and key material never belong here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: an unknown answer field or a value of the wrong type.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested form or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored answers could not be decrypted, or a form template does not
    /// match its mapping. The action is blocked rather than producing a
    /// blank or partially filled document.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// The device key (or another local resource) is unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Unprocessable(_) => 422,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Unprocessable(_) => "unprocessable",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
