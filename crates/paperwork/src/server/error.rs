//! Mapping from module errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tracing::warn;

use crate::answers::VaultError;
use crate::assembler::AssemblyError;
use crate::forms::RegistryError;
use crate::keys::KeyError;

/// A [`ServiceError`] that renders as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<KeyError> for ApiError {
    fn from(err: KeyError) -> Self {
        Self(ServiceError::Unavailable(err.to_string()))
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(ServiceError::NotFound(err.to_string()))
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        let mapped = match &err {
            VaultError::UnknownField(_) | VaultError::InvalidAnswer(_) => {
                ServiceError::BadRequest(err.to_string())
            }
            VaultError::Incomplete(_) => ServiceError::Unprocessable(err.to_string()),
            VaultError::Cipher { .. } | VaultError::Store(_) => {
                ServiceError::Internal(err.to_string())
            }
        };
        Self(mapped)
    }
}

impl From<AssemblyError> for ApiError {
    fn from(err: AssemblyError) -> Self {
        let mapped = match &err {
            AssemblyError::FieldNotFound { .. } | AssemblyError::UnsupportedFieldType { .. } => {
                ServiceError::Unprocessable(err.to_string())
            }
            AssemblyError::Cancelled { .. } => ServiceError::Unavailable(err.to_string()),
            AssemblyError::TemplateLoadFailed { .. } | AssemblyError::SerializeFailed { .. } => {
                ServiceError::Internal(err.to_string())
            }
        };
        Self(mapped)
    }
}
